use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vertexpos::prelude::*;

/// One positioning query: a flat diagram, the edge to split, and the new site.
#[derive(Debug, Deserialize)]
pub struct Scene {
    pub diagram: EdgeTable,
    pub edge: EdgeId,
    pub new_site: Site,
    #[serde(default)]
    pub cfg: PositionerCfg,
}

/// Result record written by `position`.
#[derive(Debug, Serialize, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub t: f64,
    pub k3: f64,
    pub edge_error: f64,
}

impl Scene {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("reading scene {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing scene {}", path.display()))
    }

    pub fn solve(&self) -> Result<Placement> {
        let edge = self
            .diagram
            .split_edge(self.edge)
            .ok_or_else(|| PositionError::UnknownEdge(format!("{:?}", self.edge)))?;
        let mut vp = VertexPositioner::with_cfg(&self.diagram, self.cfg);
        let sl = vp.position_on_edge(&edge, &self.new_site)?;
        let edge_error = vp.get_stat().last().copied().unwrap_or(f64::INFINITY);
        tracing::info!(x = sl.p.x, y = sl.p.y, t = sl.t, k3 = sl.k3, edge_error, "placed");
        Ok(Placement {
            x: sl.p.x,
            y: sl.p.y,
            t: sl.t,
            k3: sl.k3,
            edge_error,
        })
    }
}
