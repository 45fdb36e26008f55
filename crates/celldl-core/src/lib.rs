//! CellDL Core Types and Definitions
//!
//! This crate provides the foundational types used by the CellDL viewer. It
//! includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Points, bounds, affine transforms, restricted values and
//!   control rectangles ([`geometry`] module)
//! - **Units**: Conversion of CSS lengths to and from pixels ([`units`] module)

pub mod geometry;
pub mod identifier;
pub mod units;
