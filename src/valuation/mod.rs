//! NPV evaluation, IRR solving and NPV curve generation

mod npv;
mod irr;
mod curve;

pub use npv::{npv_and_derivative, npv_at_rate};
pub use irr::{calculate_irr, Convergence, IrrSolution};
pub use curve::{npv_curve, zero_crossings, CurvePoint};
