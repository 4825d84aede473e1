//! # zdd-rs: Zero-suppressed Decision Diagrams in Rust
//!
//! **`zdd-rs`** is a safe, manager-centric library for working with
//! **Zero-suppressed Decision Diagrams (ZDDs)**, the canonical representation
//! of families of finite sets. It is designed for combinatorial problems
//! where sparse set families dominate: independent sets, hitting sets,
//! primes, configurations.
//!
//! ## What is a ZDD?
//!
//! A ZDD represents a family of sets over a fixed universe of variables as a
//! directed acyclic graph. Where a BDD suppresses nodes whose branches agree,
//! a ZDD suppresses nodes whose high branch is the empty family --- so a set
//! family occupies space proportional to what its sets *contain*, not to the
//! size of the universe. For a fixed variable ordering every family has
//! exactly one representation, which makes equality a handle comparison.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All operations go through the
//!   [`Zdd`][crate::zdd::Zdd] manager. This ensures structural sharing
//!   (hash consing) and maintains the canonical form invariant.
//! - **Lightweight Handles**: Diagrams are referenced by plain integer
//!   [`ZddId`][crate::reference::ZddId] handles into the manager's arena.
//! - **Explicit Lifecycle**: Reference counting with deferred reclamation.
//!   Released nodes stay revivable through the unique tables and operation
//!   caches until garbage collection actually recycles their slots.
//! - **Set Algebra**: union, intersection, difference, join, meet,
//!   maximal, nonsubsets, nonsupersets, and k-combinations, each with its
//!   own memo cache.
//!
//! ## Basic Usage
//!
//! ```rust
//! use zdd_rs::zdd::Zdd;
//!
//! // 1. Initialize the manager for a 3-variable universe
//! let mut zdd = Zdd::new(3);
//!
//! // 2. Start from the elementary families {{v}}
//! let e0 = zdd.elementary(0);
//! let e1 = zdd.elementary(1);
//!
//! // 3. Combine: {{0}, {1}} and {{0, 1}}
//! let both = zdd.union(e0, e1);
//! let pair = zdd.join(e0, e1);
//!
//! // 4. Canonicity makes equality a handle comparison
//! let family = zdd.union(both, pair);
//! let maximal = zdd.maximal(family);
//! assert_eq!(maximal, pair);
//!
//! // 5. Inspect
//! assert_eq!(zdd.count_sets(family), 3u32.into());
//! assert_eq!(zdd.sets(pair).next(), Some(vec![0, 1]));
//!
//! // 6. Hand back what you own
//! for handle in [both, pair, family, maximal] {
//!     zdd.release(handle);
//! }
//! ```
//!
//! ## Core Components
//!
//! - **[`zdd`]**: The heart of the library. Contains the
//!   [`Zdd`][crate::zdd::Zdd] manager and core algorithms.
//! - **[`iter`]**: Enumerating the sets of a family.
//! - **[`count`]**: Counting sets (arbitrary precision) and nodes.
//! - **[`dot`]**: Utilities for visualizing ZDDs using Graphviz.
//!
//! For a deep dive into the implementation details, check the [`zdd`] module
//! documentation.

pub mod cache;
pub mod count;
pub mod debug;
pub mod dot;
pub mod iter;
pub mod node;
pub mod reference;
pub mod subtable;
pub mod zdd;
