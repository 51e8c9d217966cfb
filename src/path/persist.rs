// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Persisted document layout of a path.
//!
//! Only image-space geometry is stored. Component coordinates, moving
//! points and the build state are transient and rebuilt on load.

use super::anchor::{AnchorPoint, HandleSide, HandleType};
use super::point::DualPoint;
use super::subpath::SubPath;
use super::Path;
use crate::editing::ViewTransform;
use crate::error::PathError;
use kurbo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointData {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for PointData {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PointData> for Point {
    fn from(p: PointData) -> Self {
        Point::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorData {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub handle_type: HandleType,
    pub ctrl_in: PointData,
    pub ctrl_out: PointData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubPathData {
    pub closed: bool,
    pub finished: bool,
    pub anchors: Vec<AnchorData>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathData {
    pub subpaths: Vec<SubPathData>,
}

impl From<&AnchorPoint> for AnchorData {
    fn from(anchor: &AnchorPoint) -> Self {
        Self {
            x: anchor.im().x,
            y: anchor.im().y,
            handle_type: anchor.handle_type(),
            ctrl_in: anchor.ctrl(HandleSide::In).pos.im.into(),
            ctrl_out: anchor.ctrl(HandleSide::Out).pos.im.into(),
        }
    }
}

impl Path {
    pub fn to_data(&self) -> PathData {
        PathData {
            subpaths: self
                .subpaths()
                .iter()
                .map(|sp| SubPathData {
                    closed: sp.is_closed(),
                    finished: sp.is_finished(),
                    anchors: sp.anchors().iter().map(AnchorData::from).collect(),
                })
                .collect(),
        }
    }

    /// Rebuild a path from its persisted form. Subpaths without anchors
    /// are dropped.
    pub fn from_data(data: &PathData, view: &dyn ViewTransform) -> Path {
        let subpaths = data
            .subpaths
            .iter()
            .filter(|sp| !sp.anchors.is_empty())
            .map(|sp| {
                let anchors = sp
                    .anchors
                    .iter()
                    .map(|a| {
                        AnchorPoint::from_parts(
                            DualPoint::from_image(Point::new(a.x, a.y)),
                            a.ctrl_in.into(),
                            a.ctrl_out.into(),
                            a.handle_type,
                        )
                    })
                    .collect();
                let mut subpath = SubPath::from_parts(anchors, sp.closed, sp.finished);
                subpath.sync_co(view);
                subpath
            })
            .collect();
        Path::from_subpaths(subpaths)
    }

    pub fn to_json(&self) -> Result<String, PathError> {
        Ok(serde_json::to_string_pretty(&self.to_data())?)
    }

    pub fn from_json(json: &str, view: &dyn ViewTransform) -> Result<Path, PathError> {
        let data: PathData = serde_json::from_str(json)?;
        Ok(Path::from_data(&data, view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::ViewPort;
    use crate::path::BuildState;
    use kurbo::Vec2;

    fn sample_path() -> Path {
        let mut path = Path::new();
        let sp = path.start_new_subpath(AnchorPoint::new(DualPoint::from_image(Point::new(1.0, 2.0))));
        sp.add_cubic_curve(Point::new(5.0, 0.0), Point::new(8.0, 0.0), Point::new(10.0, 2.0));
        sp.add_line(Point::new(10.0, 20.0));
        sp.close();
        path
    }

    #[test]
    fn json_uses_documented_field_names() {
        let json = sample_path().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let anchor = &value["subpaths"][0]["anchors"][1];
        assert_eq!(value["subpaths"][0]["closed"], true);
        assert_eq!(value["subpaths"][0]["finished"], true);
        assert_eq!(anchor["type"], "SMOOTH");
        assert_eq!(anchor["ctrlIn"]["x"], 8.0);
        assert_eq!(anchor["x"], 10.0);
        assert!(anchor.get("ctrlOut").is_some());
    }

    #[test]
    fn load_restores_geometry_and_resets_transients() {
        let path = sample_path();
        let json = path.to_json().unwrap();
        let view = ViewPort::new(2.0, Vec2::ZERO);
        let loaded = Path::from_json(&json, &view).unwrap();

        assert_eq!(loaded.build_state(), BuildState::Idle);
        assert_eq!(loaded.to_data(), path.to_data());
        let first = loaded.subpaths()[0].anchors()[0].pos;
        assert_eq!(first.co, Point::new(2.0, 4.0));
        assert!(loaded.check_consistency().is_ok());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let view = ViewPort::default();
        assert!(matches!(Path::from_json("{\"subpaths\": 3}", &view), Err(PathError::Json(_))));
    }
}
