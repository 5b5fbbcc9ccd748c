//! The stats page with charts of monthly and per-category spending.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    summary::charts::{
        ChartData, StatsChart, category_totals_chart, charts_script, charts_view,
        monthly_totals_chart,
    },
};

/// Render the stats page.
///
/// The page itself needs no data since the charts load their totals from
/// the summary endpoints.
pub async fn get_stats_page() -> Response {
    let charts = [
        StatsChart {
            id: "monthly-summary-chart",
            options: monthly_totals_chart().to_string(),
            data: ChartData::MonthlyTotals,
        },
        StatsChart {
            id: "category-summary-chart",
            options: category_totals_chart().to_string(),
            data: ChartData::CategoryTotals,
        },
    ];

    stats_view(&charts).into_response()
}

fn stats_view(charts: &[StatsChart]) -> Markup {
    let content = html!(
        (NavBar::new(endpoints::STATS_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Stats" }

            (charts_view(charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ];

    base("Stats", &scripts, &content)
}
