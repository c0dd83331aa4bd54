// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram Bot API delivery for cycle prompts and acknowledgements.

pub mod notifier;
pub mod split;

pub use notifier::TelegramNotifier;
pub use split::split_chunks;
