// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram text formats.
//!
//! Only a PlantUML-style class diagram subset is supported: class blocks with member lines and
//! `A <symbol> B : label` relationship lines.

pub mod plantuml;

pub use plantuml::{
    export_class_diagram, into_records, parse_class_diagram, relationship_symbol, ImportGrammar,
    ParsedClass, ParsedClassDiagram, ParsedRelation,
};
