//! # hydro_core - Hull Hydrostatics and Intact Stability Engine
//!
//! `hydro_core` computes the hydrostatic properties of a ship hull described
//! by an offset table, sweeps heel angle to build the righting-arm (GZ)
//! curve, and checks that curve against the IMO intact-stability criteria.
//! All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions over an immutable, validated geometry
//! - **JSON-First**: All records implement Serialize/Deserialize
//! - **No silent NaN**: Ratios with a zero denominator are explicit
//!   [`Quantity::Undefined`] values, failures are [`HydroError`] variants
//! - **Deterministic**: Same hull, loadcase and draft give bit-identical results
//!
//! ## Quick Start
//!
//! ```rust
//! use hydro_core::criteria::check_intact_stability;
//! use hydro_core::geometry::HullGeometry;
//! use hydro_core::hydrostatics::compute_at_draft;
//! use hydro_core::loadcase::Loadcase;
//! use hydro_core::stability::{compute_gz_curve, GzCurveInput};
//!
//! let hull = HullGeometry::rectangular_barge(100.0, 20.0, 10.0, 21, 41)?;
//! let lc = Loadcase::sea_water(5.0)?;
//!
//! let hs = compute_at_draft(&hull, Some(&lc), 5.0, 0.0)?;
//! println!("GMt = {:.3} m", hs.gmt_m.require("GMt")?);
//!
//! let curve = compute_gz_curve(&hull, &lc, &GzCurveInput::new(5.0, 0.0, 60.0, 1.0))?;
//! let report = check_intact_stability(&curve)?;
//! assert!(report.all_criteria_passed);
//! # Ok::<(), hydro_core::errors::HydroError>(())
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - Validated offset table and benchmark hull generators
//! - [`loadcase`] - Water density and KG
//! - [`integration`] - Composite Simpson/trapezoid quadrature
//! - [`hydrostatics`] - Per-draft hydrostatic properties and tables
//! - [`stability`] - GZ curve sweep
//! - [`criteria`] - IMO intact-stability checks
//! - [`equations`] - Closed-form wall-sided and benchmark formulas
//! - [`quantity`] - Defined/undefined numeric results
//! - [`interrupt`] - Cooperative cancellation for long sweeps
//! - [`settings`] - Sweep and criteria defaults
//! - [`case`] / [`case_io`] - JSON case files with atomic saves
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod case;
pub mod case_io;
pub mod criteria;
pub mod equations;
pub mod errors;
pub mod geometry;
pub mod hydrostatics;
pub mod integration;
pub mod interrupt;
pub mod loadcase;
pub mod quantity;
pub mod settings;
pub mod stability;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use case::VesselCase;
pub use case_io::{load_case, save_case};
pub use criteria::{check_intact_stability, CriteriaReport, CriterionResult, IntactCriterion};
pub use errors::{GeometryIssue, HydroError, HydroResult};
pub use geometry::HullGeometry;
pub use hydrostatics::{
    compute_at_draft, hydrostatic_table, HydrostaticCalculator, HydrostaticResult,
    HydrostaticsEngine,
};
pub use integration::{CompositeSimpson, Integrator};
pub use interrupt::{CancelToken, Deadline, Interrupt, Never};
pub use loadcase::{LoadItem, Loadcase};
pub use quantity::{Quantity, UndefinedReason};
pub use settings::AnalysisSettings;
pub use stability::{compute_gz_curve, GzCurveInput, GzPoint, StabilityCurveResult};
