// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A diagram holds ordered class nodes, relationship edges between them, and the current
//! selection (node section focus plus an independent edge focus).

pub mod diagram;
pub mod edge;
pub(crate) mod fixtures;
pub mod ids;
pub mod node;
pub mod section;

pub use diagram::{Diagram, DiagramSnapshot};
pub use edge::{
    visual_offset, ParseRelationshipTypeError, RelationshipEdge, RelationshipType,
    DEFAULT_EDGE_LABEL, EDGE_OFFSET_AMOUNT,
};
pub use ids::{EdgeId, Id, IdAllocator, IdError, NodeId};
pub use node::{
    default_class_name, ClassNode, NodeFieldsPatch, Position, Viewport, PLACEHOLDER_ATTRIBUTE,
    PLACEHOLDER_METHOD,
};
pub use section::{Section, SectionLayout, Selection};
