//! Exceedance probability tables.

use crate::colors::{exceedance_color, CLEAR};
use crate::inputs::{PlotContext, PlotData};
use glows_chart::{axis, Annotation, Domain, Figure, Layout, Table};
use glows_core::{DatasetType, Result};
use glows_stats::exceedance::{exceedance_table, ExceedanceTable};

const TITLE: &str = "Forecast Exceedance Probabilities";
const CORRECTED_TITLE: &str = "Bias-Corrected Exceedance Probabilities";

fn table_trace(table: &ExceedanceTable) -> Table {
    let mut headers = vec!["Date".to_string()];
    let mut values = vec![axis(table.dates.iter().copied())];
    let mut colors = vec![vec![CLEAR.to_string(); table.dates.len()]];
    for (period, percents) in &table.columns {
        headers.push(ExceedanceTable::label(*period));
        values.push(axis(percents.iter().copied()));
        colors.push(percents.iter().map(|p| exceedance_color(*period, *p)).collect());
    }
    Table::new(headers, values).cell_colors(colors)
}

/// One table of daily exceedance percentages, or two stacked tables when
/// corrected data is present.
pub fn exceedance(data: &PlotData, _ctx: &PlotContext) -> Result<Figure> {
    let mut tables = Vec::new();
    for (_, inputs) in data.variants() {
        let ensembles = inputs.series(DatasetType::ForecastEnsembles)?;
        tables.push(table_trace(&exceedance_table(ensembles, inputs.return_periods()?)?));
    }

    let mut tables = tables.into_iter();
    let (Some(simulated), corrected) = (tables.next(), tables.next()) else {
        return Ok(Figure::new(Layout::titled(TITLE)));
    };
    let figure = match corrected {
        None => {
            let mut figure = Figure::new(Layout::titled(TITLE));
            figure.push(simulated);
            figure
        }
        Some(corrected) => {
            let layout = Layout::titled(TITLE)
                .height(1200)
                .annotate(Annotation::on_paper(TITLE, 0.5, 1.0))
                .annotate(Annotation::on_paper(CORRECTED_TITLE, 0.5, 0.47));
            let mut figure = Figure::new(layout);
            figure.push(simulated.domain(Domain { x: [0.0, 1.0], y: [0.55, 1.0] }));
            figure.push(corrected.domain(Domain { x: [0.0, 1.0], y: [0.0, 0.45] }));
            figure
        }
    };
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::Inputs;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use glows_core::{Column, ReturnPeriods, RiverId, TimeSeries};

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, 0, 0).unwrap())
    }

    fn inputs(scale: f64) -> Inputs {
        let series = TimeSeries::new(
            vec![at(1, 0), at(1, 12), at(2, 0)],
            vec![
                Column::new("ensemble_01", vec![5.0 * scale, 15.0 * scale, 1.0]),
                Column::new("ensemble_02", vec![1.0, 2.0, 30.0 * scale]),
                Column::new("ensemble_52", vec![100.0, 100.0, 100.0]),
            ],
        )
        .unwrap();
        Inputs::default()
            .with_series(DatasetType::ForecastEnsembles, series)
            .with_return_periods(ReturnPeriods::from_pairs([(2, 10.0), (25, 20.0)]))
    }

    #[test]
    fn test_single_table() {
        let data = PlotData::simulated(inputs(1.0));
        let value = exceedance(&data, &PlotContext::new(RiverId(1))).unwrap().to_json().unwrap();
        assert_eq!(value["data"].as_array().unwrap().len(), 1);
        let table = &value["data"][0];
        assert_eq!(table["type"], "table");
        assert_eq!(table["header"]["values"], serde_json::json!(["Date", "2 Year", "25 Year"]));
        assert_eq!(table["cells"]["values"][0], serde_json::json!(["2024-05-01", "2024-05-02"]));
        assert_eq!(table["cells"]["values"][1], serde_json::json!([50.0, 50.0]));
        assert_eq!(table["cells"]["values"][2], serde_json::json!([0.0, 50.0]));
        assert_eq!(table["cells"]["fill"]["color"][0][0], CLEAR);
        assert_eq!(table["cells"]["fill"]["color"][1][0], "rgba(254, 240, 1, 0.25)");
        assert_eq!(value["layout"]["title"]["text"], TITLE);
    }

    #[test]
    fn test_corrected_tables_stack() {
        let data = PlotData {
            simulated: inputs(1.0),
            corrected: Some(inputs(0.1)),
        };
        let value = exceedance(&data, &PlotContext::new(RiverId(1))).unwrap().to_json().unwrap();
        assert_eq!(value["data"].as_array().unwrap().len(), 2);
        assert_eq!(value["data"][0]["domain"]["y"], serde_json::json!([0.55, 1.0]));
        assert_eq!(value["data"][1]["cells"]["values"][1], serde_json::json!([0.0, 0.0]));
        assert_eq!(value["layout"]["annotations"][1]["text"], CORRECTED_TITLE);
        assert_eq!(value["layout"]["height"], 1200);
    }
}
