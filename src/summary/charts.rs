//! ECharts configurations for the stats page.
//!
//! The charts are built without data. The page fetches the totals from the
//! summary endpoints and fills them in before the charts are drawn.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Pie, bar::Bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{endpoints, html::HeadElement};

/// How the data fetched for a chart is merged into its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChartData {
    /// `[{month, total}]` becomes the category axis labels and bar heights.
    MonthlyTotals,
    /// `[{category, total}]` becomes the pie slices.
    CategoryTotals,
}

impl ChartData {
    fn endpoint(self) -> &'static str {
        match self {
            ChartData::MonthlyTotals => endpoints::MONTHLY_SUMMARY_API,
            ChartData::CategoryTotals => endpoints::CATEGORY_SUMMARY_API,
        }
    }

    fn merge_script(self) -> &'static str {
        match self {
            ChartData::MonthlyTotals => {
                "const xAxis = Array.isArray(option.xAxis) ? option.xAxis[0] : option.xAxis;
                xAxis.data = rows.map((row) => row.month);
                option.series[0].data = rows.map((row) => row.total);"
            }
            ChartData::CategoryTotals => {
                "option.series[0].data = rows.map((row) => ({ name: row.category, value: row.total }));"
            }
        }
    }
}

/// A stats page chart with its HTML container ID and ECharts configuration.
pub(super) struct StatsChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
    pub data: ChartData,
}

pub(super) fn charts_view(charts: &[StatsChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        data-source=(chart.data.endpoint())
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the JavaScript that fetches each chart's data and draws it.
pub(super) fn charts_script(charts: &[StatsChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};

                    fetch("{}")
                        .then((response) => response.json())
                        .then((rows) => {{
                            {}
                            chart.setOption(option);
                        }})
                        .catch((error) => console.error("Could not load chart data:", error));

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id,
                chart.options,
                chart.data.endpoint(),
                chart.data.merge_script(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

pub(super) fn monthly_totals_chart() -> Chart {
    Chart::new()
        .title(Title::new().text("Monthly Spending"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Total"))
}

pub(super) fn category_totals_chart() -> Chart {
    Chart::new()
        .title(Title::new().text("Spending by Category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left("center").top("bottom"))
        .series(Pie::new().name("Category").radius("60%"))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return number == null ? '-' : currencyFormatter.format(number);",
    )
}
