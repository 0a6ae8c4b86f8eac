use maud::{html, Markup, PreEscaped};

use crate::display::{GraphSeries, WidgetSummary};
use crate::templates::layouts::{base, PageConfig};

/// Everything the populated page needs; `None` renders the empty state.
pub struct WeatherView {
    pub location: String,
    pub address: String,
    pub month_name: String,
    pub widget: WidgetSummary,
    pub series: GraphSeries,
}

/// The single page: lookup form, current-month widget, history chart.
pub fn weather_page(presets: &[&str], view: Option<&WeatherView>) -> Markup {
    let config = PageConfig {
        title: "Climatrends - Monthly Temperature History",
    };

    base(&config, weather_content(presets, view))
}

fn weather_content(presets: &[&str], view: Option<&WeatherView>) -> Markup {
    html! {
        (lookup_form(presets, view.map(|v| v.location.as_str())))

        div class="mt-4" {
            (widget_box(view))
        }

        div class="mt-4" {
            (graph_box(view.map(|v| &v.series)))
        }
    }
}

fn lookup_form(presets: &[&str], current: Option<&str>) -> Markup {
    html! {
        div class="box" {
            form method="post" action="/" {
                div class="field has-addons" {
                    div class="control is-expanded" {
                        input class="input" type="text" name="location"
                              placeholder="City, region, or landmark"
                              value=[current];
                    }
                    div class="control" {
                        div class="select" {
                            // A chosen preset wins over the text input
                            select name="preset" {
                                option value="none" selected { "Preset locations" }
                                @for preset in presets {
                                    option value=(preset) { (preset) }
                                }
                            }
                        }
                    }
                    div class="control" {
                        button class="button is-link" type="submit" { "Look up" }
                    }
                }
            }
        }
    }
}

/// Current-month summary. Placeholder values when no location is selected.
fn widget_box(view: Option<&WeatherView>) -> Markup {
    let month = view.map_or("Month", |v| v.month_name.as_str());
    let address = view.map_or("None", |v| v.address.as_str());

    html! {
        div class="box" {
            h2 class="title is-5 mb-1" { (month) " extremes" }
            p class="is-size-7 has-text-grey mb-4" { (address) }

            div class="columns is-multiline is-mobile" {
                div class="column is-one-third-tablet is-half-mobile" {
                    div class="stat-card" {
                        div class="stat-value temp-high" {
                            @if let Some(v) = view {
                                (format!("{:.1}°F", v.widget.max_temp))
                            } @else {
                                "-"
                            }
                        }
                        div class="stat-label" { "High" }
                    }
                }
                div class="column is-one-third-tablet is-half-mobile" {
                    div class="stat-card" {
                        div class="stat-value temp-low" {
                            @if let Some(v) = view {
                                (format!("{:.1}°F", v.widget.min_temp))
                            } @else {
                                "-"
                            }
                        }
                        div class="stat-label" { "Low" }
                    }
                }
                div class="column is-one-third-tablet is-half-mobile" {
                    div class="stat-card" {
                        div class="stat-value" {
                            (percent_diff_value(view))
                        }
                        div class="stat-label" { "High vs. a year ago" }
                    }
                }
            }
        }
    }
}

fn percent_diff_value(view: Option<&WeatherView>) -> Markup {
    html! {
        @if let Some(v) = view {
            @if v.widget.percent_diff.is_finite() {
                (format!("{:+.2}%", v.widget.percent_diff))
            } @else {
                // The insufficient-history sentinel is never shown as a number
                span class="is-size-6 has-text-grey" { "no year-over-year data yet" }
            }
        } @else {
            "-"
        }
    }
}

fn graph_box(series: Option<&GraphSeries>) -> Markup {
    html! {
        div class="box" {
            h2 class="title is-5 mb-4" { "Monthly highs and lows" }

            @if let Some(series) = series {
                canvas id="history-chart" height="110" {}
                script { (PreEscaped(chart_script(series))) }
            } @else {
                div class="has-text-centered has-text-grey py-4" {
                    p { "No location selected." }
                    p class="is-size-7" {
                        "Look up a place to chart its monthly temperature history."
                    }
                }
            }
        }
    }
}

fn chart_script(series: &GraphSeries) -> String {
    // Labels are "YYYY-MM" strings and values are numbers, so the JSON can
    // never contain a script-closing sequence.
    let data = serde_json::to_string(series).expect("chart series serializes");

    format!(
        r#"
const series = {data};
new Chart(document.getElementById('history-chart'), {{
    type: 'line',
    data: {{
        labels: series.labels,
        datasets: [
            {{
                label: 'Monthly high (°F)',
                data: series.maxes,
                borderColor: '#d9534f',
                backgroundColor: 'rgba(217, 83, 79, 0.1)',
                pointRadius: 0,
                tension: 0.2,
            }},
            {{
                label: 'Monthly low (°F)',
                data: series.mins,
                borderColor: '#337ab7',
                backgroundColor: 'rgba(51, 122, 183, 0.1)',
                pointRadius: 0,
                tension: 0.2,
            }},
        ],
    }},
    options: {{
        interaction: {{ mode: 'index', intersect: false }},
        scales: {{
            x: {{ ticks: {{ maxTicksLimit: 24 }} }},
            y: {{ title: {{ display: true, text: '°F' }} }},
        }},
    }},
}});
"#
    )
}
