// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! List the sources of a catalogue.

use std::path::PathBuf;

use clap::Parser;
use console::style;
use itertools::Itertools;

use super::common::InfoPrinter;
use crate::{
    direction::{Catalogue, CATALOGUE_TYPES_COMMA_SEPARATED},
    OpdSimError,
};

lazy_static::lazy_static! {
    static ref CATALOGUE_FILE_HELP: String =
        format!("A catalogue file to verify and list. Supported formats: {}. If this isn't given, the built-in catalogue is listed", *CATALOGUE_TYPES_COMMA_SEPARATED);
}

#[derive(Parser, Debug)]
pub(super) struct CatalogueArgs {
    #[clap(name = "CATALOGUE_FILE", help = CATALOGUE_FILE_HELP.as_str(), parse(from_os_str))]
    file: Option<PathBuf>,
}

impl CatalogueArgs {
    pub(super) fn run(self) -> Result<(), OpdSimError> {
        let (catalogue, title) = match self.file {
            Some(f) => {
                let catalogue = Catalogue::read_file(&f)?;
                (catalogue, format!("Catalogue {}", f.display()))
            }
            None => (Catalogue::builtin(), "Built-in catalogue".to_string()),
        };

        let mut printer = InfoPrinter::new(title.into());
        printer.push_line(format!("{} sources", catalogue.entries().len()).into());
        let mut block = vec![style("Name              RA (°)    Dec (°)  Aliases")
            .bold()
            .to_string()
            .into()];
        for entry in catalogue.entries() {
            block.push(
                format!(
                    "{:<14} {:>9.4}  {:>9.4}  {}",
                    entry.name,
                    entry.ra_deg,
                    entry.dec_deg,
                    entry.aliases.iter().join(", ")
                )
                .into(),
            );
        }
        printer.push_block(block);
        printer.display();

        Ok(())
    }
}
