//! The core decomposition algorithms: root-finding, strip sweeping,
//! obstacle-aware division, axis selection, the hierarchical driver, and
//! the two KD-tree baselines.

pub mod axis_selector;
pub mod decomposition;
pub mod divider;
pub mod kd_tree;
pub mod solver;
pub mod strip;
