//! Equipment-type distribution charts rendered as inline SVG.

use std::f64::consts::PI;

use leptos::prelude::*;

use crate::models::ChartData;

pub const PALETTE: [&str; 6] = ["#3b82f6", "#10b981", "#8b5cf6", "#f59e0b", "#ef4444", "#ec4899"];

pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

const BAR_WIDTH: f64 = 480.0;
const BAR_HEIGHT: f64 = 260.0;
const BAR_PADDING: f64 = 32.0;
const BAR_FILL_RATIO: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Lay out one bar per label inside a `width` x `height` viewport, scaled
/// so the largest value fills the plot height.
pub fn bar_layout(chart: &ChartData, width: f64, height: f64) -> Vec<Bar> {
    let pairs = chart.pairs();
    if pairs.is_empty() {
        return Vec::new();
    }

    let plot_w = width - 2.0 * BAR_PADDING;
    let plot_h = height - 2.0 * BAR_PADDING;
    let slot = plot_w / pairs.len() as f64;
    let bar_w = slot * BAR_FILL_RATIO;
    let max = chart.max_value();

    pairs
        .into_iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let h = if max > 0.0 { (value.max(0.0) / max) * plot_h } else { 0.0 };
            Bar {
                label,
                value,
                x: BAR_PADDING + i as f64 * slot + (slot - bar_w) / 2.0,
                y: BAR_PADDING + plot_h - h,
                width: bar_w,
                height: h,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub fraction: f64,
    /// SVG path, or `None` when the slice is the whole circle.
    pub path: Option<String>,
    pub color: &'static str,
}

/// Slices for a pie of radius `r` centred on (`cx`, `cy`), clockwise from
/// 12 o'clock. Zero and negative values get no slice.
pub fn pie_slices(chart: &ChartData, cx: f64, cy: f64, r: f64) -> Vec<PieSlice> {
    let total: f64 = chart.pairs().iter().map(|(_, v)| v.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut angle = -PI / 2.0;
    chart
        .pairs()
        .into_iter()
        .enumerate()
        .filter(|(_, (_, v))| *v > 0.0)
        .map(|(i, (label, value))| {
            let fraction = value / total;
            let sweep = fraction * 2.0 * PI;
            let path = if fraction >= 1.0 {
                None
            } else {
                let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
                let end = angle + sweep;
                let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
                let large_arc = if sweep > PI { 1 } else { 0 };
                Some(format!(
                    "M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {x2:.2} {y2:.2} Z"
                ))
            };
            angle += sweep;
            PieSlice {
                label,
                value,
                fraction,
                path,
                color: color_for(i),
            }
        })
        .collect()
}

fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn num(v: f64) -> String {
    format!("{:.2}", v)
}

#[component]
pub fn BarChart(#[prop(into)] title: String, chart: ChartData) -> impl IntoView {
    let bars = bar_layout(&chart, BAR_WIDTH, BAR_HEIGHT);
    let baseline = BAR_HEIGHT - BAR_PADDING;

    view! {
        <div class="chart-card">
            <style>{include_str!("charts.css")}</style>
            <h3 class="chart-title">{title}</h3>
            <svg
                class="chart-svg"
                viewBox=format!("0 0 {} {}", BAR_WIDTH, BAR_HEIGHT)
                role="img"
            >
                <line
                    class="chart-axis"
                    x1=num(BAR_PADDING)
                    y1=num(baseline)
                    x2=num(BAR_WIDTH - BAR_PADDING)
                    y2=num(baseline)
                />
                {bars.into_iter().enumerate().map(|(i, bar)| {
                    let label_x = num(bar.x + bar.width / 2.0);
                    let tip = format!("{}: {}", bar.label, format_count(bar.value));
                    view! {
                        <g class="chart-bar" aria-label=tip>
                            <rect
                                x=num(bar.x)
                                y=num(bar.y)
                                width=num(bar.width)
                                height=num(bar.height)
                                rx="4"
                                fill=color_for(i)
                            />
                            <text class="chart-value" x=label_x.clone() y=num(bar.y - 6.0) text-anchor="middle">
                                {format_count(bar.value)}
                            </text>
                            <text class="chart-label" x=label_x y=num(baseline + 18.0) text-anchor="middle">
                                {bar.label}
                            </text>
                        </g>
                    }
                }).collect::<Vec<_>>()}
            </svg>
        </div>
    }
}

#[component]
pub fn PieChart(#[prop(into)] title: String, chart: ChartData) -> impl IntoView {
    let (cx, cy, r) = (110.0, 110.0, 100.0);
    let slices = pie_slices(&chart, cx, cy, r);
    let legend = slices.clone();

    view! {
        <div class="chart-card">
            <h3 class="chart-title">{title}</h3>
            <div class="pie-layout">
                <svg class="chart-svg pie-svg" viewBox="0 0 220 220" role="img">
                    {slices.into_iter().map(|slice| {
                        let tip = format!(
                            "{}: {} ({:.1}%)",
                            slice.label,
                            format_count(slice.value),
                            slice.fraction * 100.0
                        );
                        match slice.path {
                            Some(d) => view! {
                                <path d=d fill=slice.color stroke="#fff" stroke-width="2" aria-label=tip />
                            }.into_any(),
                            None => view! {
                                <circle cx=num(cx) cy=num(cy) r=num(r) fill=slice.color aria-label=tip />
                            }.into_any(),
                        }
                    }).collect::<Vec<_>>()}
                </svg>
                <ul class="chart-legend">
                    {legend.into_iter().map(|slice| {
                        let share = format!("{:.1}%", slice.fraction * 100.0);
                        view! {
                            <li>
                                <span class="legend-swatch" style:background-color=slice.color></span>
                                <span class="legend-label">{slice.label}</span>
                                <span class="legend-share">{share}</span>
                            </li>
                        }
                    }).collect::<Vec<_>>()}
                </ul>
            </div>
        </div>
    }
}
