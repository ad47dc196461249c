//! Dashboard layout and synthesis
//!
//! Widgets are packed greedily left to right, top to bottom on a 24-column
//! grid. There is no reflow: when a row wraps, `y` advances by the height of
//! the widget just placed, so rows of mixed heights leave ragged seams.
//! Existing dashboards depend on this exact rule.

use crate::context::RunContext;
use crate::models::{WidgetSpec, GRID_WIDTH};
use crate::naming::Naming;
use crate::report::{ItemOutcome, Reporter};
use crate::resources::{
    DashboardBody, DashboardDefinition, DashboardWidget, ResourceKind, WidgetProperties,
};

use super::settle;

pub const DASHBOARD_LOCAL_ID: &str = "custom";

/// A widget with its computed grid position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedWidget<'a> {
    pub spec: &'a WidgetSpec,
    pub x: u32,
    pub y: u32,
}

/// Placed widgets in input order
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardLayout<'a> {
    placements: Vec<PlacedWidget<'a>>,
}

impl<'a> DashboardLayout<'a> {
    pub fn placements(&self) -> &[PlacedWidget<'a>] {
        &self.placements
    }

    pub fn positions(&self) -> Vec<(u32, u32)> {
        self.placements.iter().map(|p| (p.x, p.y)).collect()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Pack widgets onto the grid.
///
/// Each widget goes at the cursor, then `x` advances by its width; once
/// `x >= 24` the cursor returns to column 0 and `y` advances by that widget's
/// height. A widget that would hang past the right edge of a partly filled
/// row wraps first, using the height of the widget placed before it.
pub fn layout(widgets: &[WidgetSpec]) -> DashboardLayout<'_> {
    let mut placements = Vec::with_capacity(widgets.len());
    let (mut x, mut y) = (0u32, 0u32);
    let mut last_height = 0u32;

    for widget in widgets {
        if x > 0 && x + widget.width > GRID_WIDTH {
            x = 0;
            y = y.saturating_add(last_height);
        }

        placements.push(PlacedWidget { spec: widget, x, y });
        last_height = widget.height;

        x += widget.width;
        if x >= GRID_WIDTH {
            x = 0;
            y = y.saturating_add(widget.height);
        }
    }

    DashboardLayout { placements }
}

fn dashboard_widget(naming: &Naming, region: &str, placed: &PlacedWidget<'_>) -> DashboardWidget {
    let spec = placed.spec;
    let namespace = naming.metric_namespace();

    DashboardWidget {
        widget_type: "metric".to_string(),
        x: placed.x,
        y: placed.y,
        width: spec.width,
        height: spec.height,
        properties: WidgetProperties {
            metrics: spec
                .metrics
                .iter()
                .map(|metric| [namespace.clone(), metric.clone()])
                .collect(),
            view: spec.widget_type.view().to_string(),
            stacked: spec.widget_type.is_stacked(),
            region: region.to_string(),
            title: spec.name.clone(),
            period: spec.period,
        },
    }
}

/// The single composite dashboard for the environment
pub fn dashboard_definition(
    naming: &Naming,
    region: &str,
    layout: &DashboardLayout<'_>,
) -> DashboardDefinition {
    DashboardDefinition {
        dashboard_name: naming.resource_name(DASHBOARD_LOCAL_ID),
        dashboard_body: DashboardBody {
            widgets: layout
                .placements()
                .iter()
                .map(|placed| dashboard_widget(naming, region, placed))
                .collect(),
        },
    }
}

/// Lay out every widget and apply the dashboard in one call
pub async fn synthesize_dashboard(
    ctx: &RunContext,
    widgets: &[WidgetSpec],
    reporter: &mut dyn Reporter,
) -> ItemOutcome {
    let layout = layout(widgets);
    let dashboard = dashboard_definition(&ctx.naming, &ctx.region, &layout);

    let result = ctx.collaborators.dashboards.put_dashboard(&dashboard).await;
    settle(
        ctx,
        ResourceKind::Dashboard,
        dashboard.dashboard_name,
        result,
        reporter,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WidgetType;
    use crate::naming::Environment;

    fn widget(width: u32, height: u32) -> WidgetSpec {
        WidgetSpec {
            name: format!("w{}x{}", width, height),
            widget_type: WidgetType::Line,
            metrics: vec!["ErrorCount".to_string()],
            width,
            height,
            period: 300,
        }
    }

    #[test]
    fn test_three_tens_wrap_before_third() {
        let widgets = vec![widget(10, 5), widget(10, 5), widget(10, 5)];
        assert_eq!(layout(&widgets).positions(), vec![(0, 0), (10, 0), (0, 5)]);
    }

    #[test]
    fn test_full_width_widget_occupies_one_row() {
        let widgets = vec![widget(24, 6), widget(24, 4), widget(12, 3)];
        assert_eq!(
            layout(&widgets).positions(),
            vec![(0, 0), (0, 6), (0, 10)]
        );
    }

    #[test]
    fn test_exact_fill_wraps_on_last_widget_height() {
        // Row height is the height of the widget that completed the row.
        let widgets = vec![widget(12, 8), widget(12, 4), widget(6, 6)];
        assert_eq!(layout(&widgets).positions(), vec![(0, 0), (12, 0), (0, 4)]);
    }

    #[test]
    fn test_mixed_heights_leave_ragged_rows() {
        let widgets = vec![
            widget(8, 6),
            widget(8, 2),
            widget(8, 9),
            widget(8, 3),
        ];
        assert_eq!(
            layout(&widgets).positions(),
            vec![(0, 0), (8, 0), (16, 0), (0, 9)]
        );
    }

    #[test]
    fn test_huge_heights_saturate() {
        let widgets = vec![widget(24, u32::MAX), widget(24, u32::MAX), widget(12, 1)];
        assert_eq!(
            layout(&widgets).positions(),
            vec![(0, 0), (0, u32::MAX), (0, u32::MAX)]
        );
    }

    #[test]
    fn test_empty_layout() {
        assert!(layout(&[]).is_empty());
    }

    #[test]
    fn test_layout_is_deterministic() {
        let widgets = vec![widget(6, 6), widget(18, 3), widget(10, 5), widget(20, 2)];
        assert_eq!(layout(&widgets), layout(&widgets));
    }

    #[test]
    fn test_dashboard_body_binding() {
        let naming = Naming::new("proj", Environment::Dev);
        let widgets = vec![
            WidgetSpec {
                name: "Attendance".to_string(),
                widget_type: WidgetType::Line,
                metrics: vec!["ClockInCount".to_string(), "ClockOutCount".to_string()],
                width: 12,
                height: 6,
                period: 300,
            },
            WidgetSpec {
                name: "Errors".to_string(),
                widget_type: WidgetType::StackedArea,
                metrics: vec!["ErrorCount".to_string()],
                width: 12,
                height: 6,
                period: 60,
            },
        ];

        let layout = layout(&widgets);
        let dashboard = dashboard_definition(&naming, "ap-northeast-1", &layout);

        assert_eq!(dashboard.dashboard_name, "proj-dev-custom");
        let body = &dashboard.dashboard_body.widgets;
        assert_eq!(body.len(), 2);

        assert_eq!(body[0].widget_type, "metric");
        assert_eq!(
            body[0].properties.metrics,
            vec![
                ["proj/dev".to_string(), "ClockInCount".to_string()],
                ["proj/dev".to_string(), "ClockOutCount".to_string()],
            ]
        );
        assert_eq!(body[0].properties.view, "timeSeries");
        assert!(!body[0].properties.stacked);
        assert_eq!(body[0].properties.title, "Attendance");

        assert_eq!((body[1].x, body[1].y), (12, 0));
        assert_eq!(body[1].properties.view, "stacked_area");
        assert!(body[1].properties.stacked);
        assert_eq!(body[1].properties.period, 60);
        assert_eq!(body[1].properties.region, "ap-northeast-1");

        let json: serde_json::Value =
            serde_json::from_str(&dashboard.body_json().unwrap()).unwrap();
        assert_eq!(json["widgets"][0]["properties"]["metrics"][0][0], "proj/dev");
        assert_eq!(json["widgets"][1]["type"], "metric");
    }
}
