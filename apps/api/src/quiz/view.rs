//! Result view — display-ready mapping of an archetype.
//!
//! The front end owns styling and chart drawing. This module only decides
//! what to show: the title, `#tag` labels, and the radar series in a stable
//! axis order with the polygon closed.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::quiz::interpreter::{ArchetypeResult, MAX_SCORE};
use crate::quiz::theme::Theme;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    /// Axis labels; the first label is repeated at the end to close the polygon.
    pub axes: Vec<String>,
    pub values: Vec<u8>,
    pub range: [u8; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub title: String,
    pub tags: Vec<String>,
    pub quote: String,
    pub radar: RadarSeries,
}

impl ResultView {
    pub fn build(theme: Theme, archetype: &ArchetypeResult) -> Self {
        let title = match archetype.animal.trim() {
            "" => theme.unnamed_title().to_string(),
            animal => animal.to_string(),
        };

        let quote = match archetype.quote.trim() {
            "" => String::new(),
            quote => format!("“{quote}”"),
        };

        ResultView {
            title,
            tags: archetype
                .keywords
                .iter()
                .map(|k| format!("#{}", k.trim().trim_start_matches('#')))
                .collect(),
            quote,
            radar: radar_series(theme, &archetype.stats),
        }
    }
}

/// Theme axes first in theme order, then any extra axes by name.
pub fn radar_series(theme: Theme, stats: &BTreeMap<String, u8>) -> RadarSeries {
    let theme_axes = theme.stat_axes();

    let mut points: Vec<(String, u8)> = theme_axes
        .iter()
        .filter_map(|axis| stats.get(*axis).map(|v| (axis.to_string(), *v)))
        .collect();

    points.extend(
        stats
            .iter()
            .filter(|(axis, _)| !theme_axes.iter().any(|a| *a == axis.as_str()))
            .map(|(axis, v)| (axis.clone(), *v)),
    );

    if let Some(first) = points.first().cloned() {
        points.push(first);
    }

    let (axes, values): (Vec<String>, Vec<u8>) = points.into_iter().unzip();
    RadarSeries {
        axes,
        values,
        range: [0, MAX_SCORE],
    }
}
