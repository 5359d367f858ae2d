//! Decomposition of the product-automaton `data.txt` input contract (§6).
//!
//! Building a generalized parity game from a set of HOA automata is an
//! external collaborator's responsibility (see the crate-level Non-goals);
//! this module only splits the driving `data.txt` file into the pieces that
//! collaborator needs, so a future HOA front-end can hand its product
//! straight to [`crate::Arena::new`].

use std::io::BufRead;
use std::io::Read;
use std::path::PathBuf;

use thiserror::Error;

use gpg_utilities::GpgError;

#[derive(Error, Debug)]
pub enum IOError {
    #[error("data.txt must have at least 3 lines: input APs, output APs, and one automaton path")]
    TooFewLines,
}

/// The three sections of a `data.txt` product-automaton descriptor: the
/// input atomic propositions, the output atomic propositions, and the list
/// of HOA automaton file paths (one per remaining line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomataInput {
    pub input_aps: Vec<String>,
    pub output_aps: Vec<String>,
    pub automaton_paths: Vec<PathBuf>,
}

/// Splits a `data.txt` reader into its three sections. Does not parse the
/// referenced HOA files.
pub fn read_data_txt(reader: impl Read) -> Result<AutomataInput, GpgError> {
    let mut lines = std::io::BufReader::new(reader).lines();

    let input_line = lines.next().ok_or(IOError::TooFewLines)??;
    let output_line = lines.next().ok_or(IOError::TooFewLines)??;

    let input_aps = input_line.split_whitespace().map(str::to_string).collect();
    let output_aps = output_line.split_whitespace().map(str::to_string).collect();

    let mut automaton_paths = Vec::new();
    for line in lines {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            automaton_paths.push(PathBuf::from(line));
        }
    }

    if automaton_paths.is_empty() {
        return Err(IOError::TooFewLines.into());
    }

    Ok(AutomataInput {
        input_aps,
        output_aps,
        automaton_paths,
    })
}

#[cfg(test)]
mod tests {
    use gpg_macros::gpg_test;

    use super::read_data_txt;

    #[gpg_test]
    fn test_read_data_txt_sections() {
        let input = b"req ack\ngrant\nautomata/a.hoa\nautomata/b.hoa\n";
        let parsed = read_data_txt(&input[..]).unwrap();

        assert_eq!(parsed.input_aps, vec!["req".to_string(), "ack".to_string()]);
        assert_eq!(parsed.output_aps, vec!["grant".to_string()]);
        assert_eq!(parsed.automaton_paths.len(), 2);
    }
}
