use crate::trace::AxisValue;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Title { text: text.into() }
    }
}

/// Range selector button, e.g. "1 year back".
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Button {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    pub label: String,
    pub step: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stepmode: Option<String>,
}

impl Button {
    pub fn back(count: u32, label: &str, step: &str) -> Self {
        Button {
            count: Some(count),
            label: label.to_string(),
            step: step.to_string(),
            stepmode: Some("backward".to_string()),
        }
    }

    pub fn all() -> Self {
        Button {
            count: None,
            label: "all".to_string(),
            step: "all".to_string(),
            stepmode: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RangeSelector {
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Vec<AxisValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangemode: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<AxisValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticktext: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverformat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeselector: Option<RangeSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

impl Axis {
    pub fn titled(text: impl Into<String>) -> Self {
        Axis {
            title: Some(Title::new(text)),
            ..Axis::default()
        }
    }

    pub fn range(mut self, low: impl Into<AxisValue>, high: impl Into<AxisValue>) -> Self {
        self.range = Some(vec![low.into(), high.into()]);
        self
    }

    /// Start the axis at zero and let the top follow the data.
    pub fn from_zero(mut self) -> Self {
        self.rangemode = Some("tozero".to_string());
        self
    }

    pub fn date(mut self) -> Self {
        self.axis_type = Some("date".to_string());
        self
    }

    pub fn ticks(mut self, values: Vec<AxisValue>, text: Vec<String>) -> Self {
        self.tickvals = Some(values);
        self.ticktext = Some(text);
        self
    }

    pub fn tick_format(mut self, format: &str) -> Self {
        self.tickformat = Some(format.to_string());
        self
    }

    pub fn hover_format(mut self, format: &str) -> Self {
        self.hoverformat = Some(format.to_string());
        self
    }

    pub fn range_selector(mut self, buttons: Vec<Button>) -> Self {
        self.rangeselector = Some(RangeSelector { buttons });
        self.rangeslider = Some(RangeSlider { visible: true });
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Legend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traceorder: Option<String>,
}

/// Free text placed on the figure, used for subplot headings.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub xref: String,
    pub yref: String,
    pub showarrow: bool,
}

impl Annotation {
    /// Text anchored at a fraction of the plotting area.
    pub fn on_paper(text: impl Into<String>, x: f64, y: f64) -> Self {
        Annotation {
            text: text.into(),
            x,
            y,
            xref: "paper".to_string(),
            yref: "paper".to_string(),
            showarrow: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Layout {
    pub fn titled(text: impl Into<String>) -> Self {
        Layout {
            title: Some(Title::new(text)),
            ..Layout::default()
        }
    }

    pub fn x_axis(mut self, axis: Axis) -> Self {
        self.xaxis = Some(axis);
        self
    }

    pub fn y_axis(mut self, axis: Axis) -> Self {
        self.yaxis = Some(axis);
        self
    }

    pub fn x_title(self, text: impl Into<String>) -> Self {
        self.x_axis(Axis::titled(text))
    }

    pub fn y_title(self, text: impl Into<String>) -> Self {
        self.y_axis(Axis::titled(text))
    }

    pub fn legend_title(mut self, text: impl Into<String>) -> Self {
        self.legend = Some(Legend {
            title: Some(Title::new(text)),
            orientation: None,
            traceorder: Some("normal".to_string()),
        });
        self
    }

    pub fn horizontal_legend(mut self) -> Self {
        self.legend = Some(Legend {
            title: None,
            orientation: Some("h".to_string()),
            traceorder: None,
        });
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn hover_mode(mut self, mode: &str) -> Self {
        self.hovermode = Some(mode.to_string());
        self
    }

    pub fn hide_legend(mut self) -> Self {
        self.showlegend = Some(false);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layout_json() {
        let layout = Layout::titled("Retrospective Simulation")
            .x_axis(
                Axis::titled("Date (UTC +00:00)")
                    .date()
                    .range_selector(vec![Button::back(1, "1y", "year"), Button::all()]),
            )
            .y_axis(Axis::titled("Streamflow (m³/s)").from_zero())
            .hover_mode("x");
        let value = serde_json::to_value(&layout).unwrap();
        assert_eq!(value["xaxis"]["type"], "date");
        assert_eq!(value["xaxis"]["rangeselector"]["buttons"][0]["stepmode"], "backward");
        assert_eq!(value["xaxis"]["rangeselector"]["buttons"][1], json!({"label": "all", "step": "all"}));
        assert_eq!(value["yaxis"]["rangemode"], "tozero");
        assert!(value.get("legend").is_none());
        assert!(value.get("annotations").is_none());
    }

    #[test]
    fn test_stacked_headings() {
        let layout = Layout::titled("Exceedance")
            .height(1200)
            .annotate(Annotation::on_paper("Forecast", 0.5, 1.0))
            .horizontal_legend();
        let value = serde_json::to_value(&layout).unwrap();
        assert_eq!(value["height"], 1200);
        assert_eq!(value["annotations"][0]["xref"], "paper");
        assert_eq!(value["annotations"][0]["showarrow"], false);
        assert_eq!(value["legend"], json!({"orientation": "h"}));
    }
}
