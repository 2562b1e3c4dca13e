// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Classflow: UML class diagram editor state.
//!
//! The [`model`] holds class nodes, relationship edges, and the section focus; [`ops`] is the
//! only way to change it; [`nav`] maps Delete/Tab/Shift+Tab onto ops; [`store`] persists the
//! diagram as a JSON blob; [`format`] moves it to and from PlantUML text. [`editor::Editor`]
//! ties them into one session and [`tui`] is the terminal front end.

pub mod editor;
pub mod format;
pub mod model;
pub mod nav;
pub mod ops;
pub mod store;
pub mod tui;
