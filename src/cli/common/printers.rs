// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pretty printers for reporting information and warnings as a tree, e.g.
//!
//! ```text
//! Array info
//! ├ 4 telescopes
//! │ 6 pairs
//! └ Cable delays applied
//! ```

use std::{borrow::Cow, sync::Mutex};

use log::Level;

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

type Block = Vec<Cow<'static, str>>;

lazy_static::lazy_static! {
    static ref WARNINGS: Mutex<Vec<Block>> = Mutex::new(vec![]);
}

/// The symbol drawn in front of a line of a block.
fn tree_symbol(i_line: usize, last_line: bool, last_block: bool) -> char {
    match (i_line, last_line, last_block) {
        (0, true, true) => UP_AND_RIGHT,
        (0, _, _) => VERTICAL_AND_RIGHT,
        _ => VERTICAL,
    }
}

fn print_tree(level: Level, title: &str, blocks: &[Block]) {
    log::log!(level, "{}", console::style(title).bold());
    let num_blocks = blocks.len();
    for (i_block, block) in blocks.iter().enumerate() {
        let num_lines = block.len();
        for (i_line, line) in block.iter().enumerate() {
            let symbol = tree_symbol(i_line, i_line + 1 == num_lines, i_block + 1 == num_blocks);
            log::log!(level, "{symbol} {line}");
        }
    }
    log::log!(level, "");
}

/// Collects lines of information under a title, and logs them all at once.
pub(crate) struct InfoPrinter {
    title: Cow<'static, str>,
    blocks: Vec<Block>,
}

impl InfoPrinter {
    pub(crate) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            blocks: vec![],
        }
    }

    pub(crate) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    pub(crate) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        self.blocks.push(block);
    }

    pub(crate) fn display(self) {
        print_tree(Level::Info, &self.title, &self.blocks);
    }
}

/// Something that can be deferred as a warning; see [`display_warnings`].
pub(crate) trait Warn {
    fn warn(self);
}

fn push_warning(block: Block) {
    let mut warnings = match WARNINGS.lock() {
        Ok(w) => w,
        Err(poisoned) => poisoned.into_inner(),
    };
    warnings.push(block);
}

impl Warn for &'static str {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for String {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for Cow<'static, str> {
    fn warn(self) {
        push_warning(vec![self]);
    }
}

impl Warn for Vec<Cow<'static, str>> {
    fn warn(self) {
        push_warning(self);
    }
}

/// Print out any warnings that have been collected while arguments were
/// parsed. Once printed, the warnings are forgotten.
pub(crate) fn display_warnings() {
    log::debug!("Displaying warnings");
    let mut warnings = match WARNINGS.lock() {
        Ok(w) => w,
        Err(poisoned) => poisoned.into_inner(),
    };
    if warnings.is_empty() {
        return;
    }
    print_tree(Level::Warn, "Warnings", &warnings);
    warnings.clear();
}
