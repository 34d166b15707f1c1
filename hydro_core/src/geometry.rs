//! # Hull Geometry
//!
//! Immutable, validated snapshot of a hull's offset table:
//!
//! ```text
//!             station 0   station 1   ...   station N-1
//!  wl M-1  │   y[0][M-1]   y[1][M-1]         y[N-1][M-1]
//!   ...    │
//!  wl 0    │   y[0][0]     y[1][0]           y[N-1][0]
//!          └──────────────────────────────────────────── X (aft → fwd)
//! ```
//!
//! - Stations: longitudinal positions X (m), strictly increasing, X ≥ 0
//! - Waterlines: heights above keel Z (m), strictly increasing, Z ≥ 0
//! - Offsets: half-breadth Y ≥ 0 at every station × waterline (dense grid)
//!
//! Only one side of the hull is stored; port/starboard symmetry is assumed.
//! All invariants are checked on construction and on deserialization, so a
//! `HullGeometry` value in hand is always well-formed.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::geometry::HullGeometry;
//!
//! let hull = HullGeometry::new(
//!     vec![0.0, 50.0, 100.0],
//!     vec![0.0, 5.0, 10.0],
//!     vec![vec![10.0; 3]; 3],
//! ).unwrap();
//!
//! assert_eq!(hull.station_count(), 3);
//! assert!((hull.length_between_perpendiculars() - 100.0).abs() < 1e-12);
//!
//! // Stations out of order are rejected, never re-sorted
//! let unsorted = HullGeometry::new(vec![0.0, 60.0, 50.0], vec![0.0, 5.0], vec![vec![1.0; 2]; 3]);
//! assert!(unsorted.is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{GeometryIssue, HydroError, HydroResult};
use crate::integration::interpolate;

/// A transverse section at longitudinal position `x_m`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Station {
    pub index: usize,
    pub x_m: f64,
}

/// A horizontal level at height `z_m` above the keel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Waterline {
    pub index: usize,
    pub z_m: f64,
}

/// One half-breadth sample as delivered by an external store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OffsetRecord {
    pub station: usize,
    pub waterline: usize,
    pub half_breadth_m: f64,
}

/// Serialized form of [`HullGeometry`].
///
/// `half_breadths_m[i][j]` is the offset at station `i`, waterline `j`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HullGeometryData {
    pub stations_m: Vec<f64>,
    pub waterlines_m: Vec<f64>,
    pub half_breadths_m: Vec<Vec<f64>>,
}

/// Validated dense offset table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HullGeometryData", into = "HullGeometryData")]
pub struct HullGeometry {
    stations: Vec<f64>,
    waterlines: Vec<f64>,
    /// row-major: one row of M half-breadths per station
    offsets: Vec<Vec<f64>>,
}

impl TryFrom<HullGeometryData> for HullGeometry {
    type Error = HydroError;

    fn try_from(data: HullGeometryData) -> HydroResult<Self> {
        HullGeometry::new(data.stations_m, data.waterlines_m, data.half_breadths_m)
    }
}

impl From<HullGeometry> for HullGeometryData {
    fn from(hull: HullGeometry) -> Self {
        HullGeometryData {
            stations_m: hull.stations,
            waterlines_m: hull.waterlines,
            half_breadths_m: hull.offsets,
        }
    }
}

impl HullGeometry {
    /// Build from station X positions, waterline Z positions and a
    /// `[station][waterline]` grid of half-breadths.
    pub fn new(
        stations_m: Vec<f64>,
        waterlines_m: Vec<f64>,
        half_breadths_m: Vec<Vec<f64>>,
    ) -> HydroResult<Self> {
        validate_axis("station", &stations_m)?;
        validate_axis("waterline", &waterlines_m)?;

        if half_breadths_m.len() != stations_m.len() {
            return Err(HydroError::geometry(
                GeometryIssue::DimensionMismatch,
                "offsets",
                format!(
                    "{} offset rows for {} stations",
                    half_breadths_m.len(),
                    stations_m.len()
                ),
            ));
        }
        for (i, row) in half_breadths_m.iter().enumerate() {
            if row.len() != waterlines_m.len() {
                // short rows mean pairs without an offset
                let issue = if row.len() < waterlines_m.len() {
                    GeometryIssue::MissingOffset
                } else {
                    GeometryIssue::DimensionMismatch
                };
                return Err(HydroError::geometry(
                    issue,
                    format!("station {i}"),
                    format!("{} offsets for {} waterlines", row.len(), waterlines_m.len()),
                ));
            }
            for (j, &y) in row.iter().enumerate() {
                if !y.is_finite() {
                    return Err(HydroError::geometry(
                        GeometryIssue::NonFinite,
                        format!("station {i}, waterline {j}"),
                        format!("half-breadth is {y}"),
                    ));
                }
                if y < 0.0 {
                    return Err(HydroError::geometry(
                        GeometryIssue::NegativeOffset,
                        format!("station {i}, waterline {j}"),
                        format!("half-breadth {y} m is negative"),
                    ));
                }
            }
        }

        Ok(HullGeometry {
            stations: stations_m,
            waterlines: waterlines_m,
            offsets: half_breadths_m,
        })
    }

    /// Assemble the dense grid from sparse offset records.
    ///
    /// Station and waterline indices must equal their position in the
    /// slice. Every (station, waterline) pair needs exactly one record.
    pub fn from_records(
        stations: &[Station],
        waterlines: &[Waterline],
        offsets: &[OffsetRecord],
    ) -> HydroResult<Self> {
        for (pos, s) in stations.iter().enumerate() {
            if s.index != pos {
                return Err(HydroError::geometry(
                    GeometryIssue::NotMonotonic,
                    format!("station {}", s.index),
                    format!("station index {} found at position {pos}", s.index),
                ));
            }
        }
        for (pos, w) in waterlines.iter().enumerate() {
            if w.index != pos {
                return Err(HydroError::geometry(
                    GeometryIssue::NotMonotonic,
                    format!("waterline {}", w.index),
                    format!("waterline index {} found at position {pos}", w.index),
                ));
            }
        }

        let mut grid: Vec<Vec<Option<f64>>> = vec![vec![None; waterlines.len()]; stations.len()];
        for rec in offsets {
            let slot = grid
                .get_mut(rec.station)
                .and_then(|row| row.get_mut(rec.waterline))
                .ok_or_else(|| {
                    HydroError::geometry(
                        GeometryIssue::DimensionMismatch,
                        format!("station {}, waterline {}", rec.station, rec.waterline),
                        "offset references a station or waterline that does not exist",
                    )
                })?;
            if slot.is_some() {
                return Err(HydroError::geometry(
                    GeometryIssue::DimensionMismatch,
                    format!("station {}, waterline {}", rec.station, rec.waterline),
                    "duplicate offset record",
                ));
            }
            *slot = Some(rec.half_breadth_m);
        }

        let mut dense = Vec::with_capacity(stations.len());
        for (i, row) in grid.into_iter().enumerate() {
            let mut values = Vec::with_capacity(row.len());
            for (j, y) in row.into_iter().enumerate() {
                values.push(y.ok_or_else(|| {
                    HydroError::geometry(
                        GeometryIssue::MissingOffset,
                        format!("station {i}, waterline {j}"),
                        "no offset record for this pair",
                    )
                })?);
            }
            dense.push(values);
        }

        HullGeometry::new(
            stations.iter().map(|s| s.x_m).collect(),
            waterlines.iter().map(|w| w.z_m).collect(),
            dense,
        )
    }

    // ------------------------------------------------------------------
    // Benchmark hulls
    // ------------------------------------------------------------------

    /// Box-shaped barge: constant half-breadth `beam/2` everywhere.
    ///
    /// Stations span `0..=length`, waterlines `0..=depth`, both uniformly.
    pub fn rectangular_barge(
        length_m: f64,
        beam_m: f64,
        depth_m: f64,
        n_stations: usize,
        n_waterlines: usize,
    ) -> HydroResult<Self> {
        validate_principal("length_m", length_m)?;
        validate_principal("beam_m", beam_m)?;
        validate_principal("depth_m", depth_m)?;
        let stations = linspace(0.0, length_m, n_stations, "n_stations")?;
        let waterlines = linspace(0.0, depth_m, n_waterlines, "n_waterlines")?;
        let offsets = vec![vec![beam_m / 2.0; waterlines.len()]; stations.len()];
        HullGeometry::new(stations, waterlines, offsets)
    }

    /// Wigley parabolic hull.
    ///
    /// `y = B/2 · (1 − (2ξ/L)²) · (1 − (ζ/T)²)` with ξ measured from midship
    /// and ζ downward from the design waterline. Above `draft_m` the section
    /// is wall-sided at its waterline half-breadth up to `depth_m`.
    /// At the design draft Cb = Cp·Cm = (2/3)·(2/3) ≈ 0.444.
    pub fn wigley(
        length_m: f64,
        beam_m: f64,
        draft_m: f64,
        depth_m: f64,
        n_stations: usize,
        n_waterlines: usize,
    ) -> HydroResult<Self> {
        validate_principal("length_m", length_m)?;
        validate_principal("beam_m", beam_m)?;
        validate_principal("draft_m", draft_m)?;
        if depth_m < draft_m {
            return Err(HydroError::invalid_input(
                "depth_m",
                depth_m.to_string(),
                "Depth must be at least the design draft",
            ));
        }
        let stations = linspace(0.0, length_m, n_stations, "n_stations")?;
        let waterlines = linspace(0.0, depth_m, n_waterlines, "n_waterlines")?;
        let offsets = stations
            .iter()
            .map(|&x| {
                let xi = 2.0 * (x - length_m / 2.0) / length_m;
                let plan = (1.0 - xi * xi).max(0.0);
                waterlines
                    .iter()
                    .map(|&z| {
                        let zeta = ((draft_m - z) / draft_m).max(0.0);
                        beam_m / 2.0 * plan * (1.0 - zeta * zeta)
                    })
                    .collect()
            })
            .collect();
        HullGeometry::new(stations, waterlines, offsets)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Station X positions (m)
    pub fn stations(&self) -> &[f64] {
        &self.stations
    }

    /// Waterline Z positions (m)
    pub fn waterlines(&self) -> &[f64] {
        &self.waterlines
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn waterline_count(&self) -> usize {
        self.waterlines.len()
    }

    /// Half-breadths of one station, bottom to top
    pub fn station_offsets(&self, station: usize) -> &[f64] {
        &self.offsets[station]
    }

    /// Half-breadth at a grid intersection
    pub fn half_breadth(&self, station: usize, waterline: usize) -> f64 {
        self.offsets[station][waterline]
    }

    /// Distance between first and last station (m)
    pub fn length_between_perpendiculars(&self) -> f64 {
        self.stations[self.stations.len() - 1] - self.stations[0]
    }

    /// Midpoint between first and last station (m)
    pub fn midship_x(&self) -> f64 {
        0.5 * (self.stations[0] + self.stations[self.stations.len() - 1])
    }

    /// Highest waterline in the table (m)
    pub fn max_height(&self) -> f64 {
        self.waterlines[self.waterlines.len() - 1]
    }

    /// Half-breadth at `station`, linearly interpolated to height `z_m`.
    ///
    /// `None` if `z_m` lies outside the waterline range.
    pub fn half_breadth_at(&self, station: usize, z_m: f64) -> Option<f64> {
        interpolate(&self.waterlines, &self.offsets[station], z_m)
    }

    /// The part of a station's offset curve below `draft_m`.
    ///
    /// Returns `(z, y)` samples: every waterline strictly below the draft,
    /// closed by an interpolated sample at the draft itself. Empty when the
    /// draft is at or below the lowest waterline.
    pub fn immersed_section(&self, station: usize, draft_m: f64) -> (Vec<f64>, Vec<f64>) {
        let row = &self.offsets[station];
        let mut zs = Vec::with_capacity(self.waterlines.len() + 1);
        let mut ys = Vec::with_capacity(self.waterlines.len() + 1);
        if draft_m <= self.waterlines[0] {
            return (zs, ys);
        }
        for (&z, &y) in self.waterlines.iter().zip(row) {
            if z < draft_m {
                zs.push(z);
                ys.push(y);
            }
        }
        if let Some(top) = self.half_breadth_at(station, draft_m) {
            zs.push(draft_m);
            ys.push(top);
        }
        (zs, ys)
    }

    /// Largest half-breadth at or below `draft_m` over the whole hull (m)
    pub fn max_half_breadth_below(&self, draft_m: f64) -> f64 {
        (0..self.station_count())
            .flat_map(|i| self.immersed_section(i, draft_m).1)
            .fold(0.0, f64::max)
    }
}

fn validate_axis(name: &str, values: &[f64]) -> HydroResult<()> {
    if values.is_empty() {
        return Err(HydroError::geometry(
            GeometryIssue::Empty,
            format!("{name}s"),
            format!("no {name}s supplied"),
        ));
    }
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(HydroError::geometry(
                GeometryIssue::NonFinite,
                format!("{name} {i}"),
                format!("position is {v}"),
            ));
        }
        if v < 0.0 {
            return Err(HydroError::geometry(
                GeometryIssue::NegativePosition,
                format!("{name} {i}"),
                format!("position {v} m is negative"),
            ));
        }
    }
    if let Some(i) = values.windows(2).position(|w| w[1] <= w[0]) {
        return Err(HydroError::geometry(
            GeometryIssue::NotMonotonic,
            format!("{name} {}", i + 1),
            format!("position {} m does not exceed previous {} m", values[i + 1], values[i]),
        ));
    }
    Ok(())
}

fn validate_principal(field: &str, value: f64) -> HydroResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(HydroError::invalid_input(
            field,
            value.to_string(),
            "Dimension must be positive",
        ));
    }
    Ok(())
}

fn linspace(start: f64, end: f64, n: usize, field: &str) -> HydroResult<Vec<f64>> {
    if n < 2 {
        return Err(HydroError::invalid_input(field, n.to_string(), "Need at least two divisions"));
    }
    let step = (end - start) / (n - 1) as f64;
    Ok((0..n)
        .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
        .collect())
}
