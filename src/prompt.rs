//! Line-oriented selection and confirmation prompts
//!
//! Candidates are listed with 1-based numbers. The user answers with:
//! - nothing: select none
//! - `a` / `all`: select every candidate
//! - numbers separated by commas or spaces, each optionally `N@version`
//!   to override the target version
//!
//! Invalid answers re-prompt; end of input selects nothing.

use crate::domain::UpgradeCandidate;
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Interaction with the user about which candidates to apply
pub trait CandidatePrompt {
    /// Choose candidates to apply, possibly with overridden target versions
    fn select(&mut self, candidates: &[UpgradeCandidate]) -> io::Result<Vec<UpgradeCandidate>>;

    /// Confirm writing `count` upgrades to `path`
    fn confirm_apply(&mut self, count: usize, path: &Path) -> io::Result<bool>;
}

/// Parsed answer to the selection prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    None,
    All,
    /// Zero-based indexes in ascending order, with optional version override
    Items(Vec<(usize, Option<String>)>),
}

impl Selection {
    /// Apply the selection to the listed candidates
    pub fn apply(&self, candidates: &[UpgradeCandidate]) -> Vec<UpgradeCandidate> {
        match self {
            Selection::None => Vec::new(),
            Selection::All => candidates.to_vec(),
            Selection::Items(items) => items
                .iter()
                .filter_map(|(index, version)| {
                    let candidate = candidates.get(*index)?.clone();
                    Some(match version {
                        Some(version) => candidate.with_target_version(version.clone()),
                        None => candidate,
                    })
                })
                .collect(),
        }
    }
}

/// Parse a selection answer for a list of `count` candidates
pub fn parse_selection(input: &str, count: usize) -> Result<Selection, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Selection::None);
    }
    if input.eq_ignore_ascii_case("a") || input.eq_ignore_ascii_case("all") {
        return Ok(Selection::All);
    }

    // Later mentions of the same number replace earlier ones
    let mut items: BTreeMap<usize, Option<String>> = BTreeMap::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
    {
        let (number, version) = match token.split_once('@') {
            Some((number, version)) => (number, Some(version)),
            None => (token, None),
        };

        let index = number
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=count).contains(n))
            .ok_or_else(|| format!("'{}' is not a number between 1 and {}", number, count))?;

        let version = match version {
            Some(version) => {
                node_semver::Version::parse(version)
                    .map_err(|_| format!("'{}' is not a valid version", version))?;
                Some(version.to_string())
            }
            None => None,
        };

        items.insert(index - 1, version);
    }

    Ok(Selection::Items(items.into_iter().collect()))
}

/// Interpret a yes/no answer; empty means yes
fn parse_confirmation(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Prompt over a line reader and a writer (normally stdin and stdout)
pub struct TerminalPrompt<R, W> {
    reader: R,
    writer: W,
    color: bool,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            color: true,
        }
    }

    /// Enable or disable colored output (builder pattern)
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Consume the prompt, returning the writer
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Read one line; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn write_list(&mut self, candidates: &[UpgradeCandidate]) -> io::Result<()> {
        let width = candidates.len().to_string().len();
        if self.color {
            writeln!(self.writer, "{}", "Select dependencies to upgrade".bold())?;
        } else {
            writeln!(self.writer, "Select dependencies to upgrade")?;
        }
        for (index, candidate) in candidates.iter().enumerate() {
            let number = format!("{:>width$})", index + 1, width = width);
            if self.color {
                writeln!(self.writer, "  {} {}", number.cyan(), candidate)?;
            } else {
                writeln!(self.writer, "  {} {}", number, candidate)?;
            }
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> CandidatePrompt for TerminalPrompt<R, W> {
    fn select(&mut self, candidates: &[UpgradeCandidate]) -> io::Result<Vec<UpgradeCandidate>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        self.write_list(candidates)?;

        loop {
            write!(
                self.writer,
                "Numbers to upgrade (e.g. 1,3 or 2@1.4.0), 'a' for all, empty for none: "
            )?;
            self.writer.flush()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.writer)?;
                return Ok(Vec::new());
            };

            match parse_selection(&line, candidates.len()) {
                Ok(selection) => return Ok(selection.apply(candidates)),
                Err(message) => {
                    if self.color {
                        writeln!(self.writer, "{} {}", "Invalid selection:".red(), message)?;
                    } else {
                        writeln!(self.writer, "Invalid selection: {}", message)?;
                    }
                }
            }
        }
    }

    fn confirm_apply(&mut self, count: usize, path: &Path) -> io::Result<bool> {
        loop {
            write!(
                self.writer,
                "Apply {} selected upgrade(s) to {}? [Y/n] ",
                count,
                path.display()
            )?;
            self.writer.flush()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.writer)?;
                return Ok(false);
            };
            if let Some(answer) = parse_confirmation(&line) {
                return Ok(answer);
            }
            writeln!(self.writer, "Please answer 'y' or 'n'.")?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeclaredDependency, DependencySection};
    use std::io::Cursor;

    fn candidates() -> Vec<UpgradeCandidate> {
        vec![
            UpgradeCandidate::latest(
                &DeclaredDependency::new("react", "^18.2.0", DependencySection::Dependencies),
                "19.0.1",
            ),
            UpgradeCandidate::latest(
                &DeclaredDependency::new("lodash", "~4.17.20", DependencySection::Dependencies),
                "4.17.21",
            ),
            UpgradeCandidate::latest(
                &DeclaredDependency::new(
                    "typescript",
                    "5.7.3",
                    DependencySection::DevDependencies,
                ),
                "5.8.0",
            ),
        ]
    }

    fn prompt(input: &str) -> TerminalPrompt<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()).with_color(false)
    }

    fn names(selected: &[UpgradeCandidate]) -> Vec<&str> {
        selected.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_parse_empty_is_none() {
        assert_eq!(parse_selection("", 3), Ok(Selection::None));
        assert_eq!(parse_selection("   \n", 3), Ok(Selection::None));
    }

    #[test]
    fn test_parse_all() {
        assert_eq!(parse_selection("a", 3), Ok(Selection::All));
        assert_eq!(parse_selection("ALL\n", 3), Ok(Selection::All));
    }

    #[test]
    fn test_parse_numbers_sorted_and_deduplicated() {
        assert_eq!(
            parse_selection("3, 1 3", 3),
            Ok(Selection::Items(vec![(0, None), (2, None)]))
        );
    }

    #[test]
    fn test_parse_version_override() {
        assert_eq!(
            parse_selection("1@19.0.0,2", 3),
            Ok(Selection::Items(vec![
                (0, Some("19.0.0".to_string())),
                (1, None)
            ]))
        );
    }

    #[test]
    fn test_parse_out_of_range() {
        assert_eq!(
            parse_selection("4", 3),
            Err("'4' is not a number between 1 and 3".to_string())
        );
        assert!(parse_selection("0", 3).is_err());
        assert!(parse_selection("x", 3).is_err());
    }

    #[test]
    fn test_parse_invalid_override() {
        assert_eq!(
            parse_selection("1@banana", 3),
            Err("'banana' is not a valid version".to_string())
        );
    }

    #[test]
    fn test_select_lists_candidates() {
        let mut prompt = prompt("\n");
        let selected = prompt.select(&candidates()).unwrap();
        assert!(selected.is_empty());

        let output = String::from_utf8(prompt.into_writer()).unwrap();
        assert!(output.contains("1) dependencies | react | ^18.2.0 -> 19.0.1"));
        assert!(output.contains("3) devDependencies | typescript | 5.7.3 -> 5.8.0"));
    }

    #[test]
    fn test_select_some_with_override() {
        let mut prompt = prompt("1@19.0.0 3\n");
        let selected = prompt.select(&candidates()).unwrap();
        assert_eq!(names(&selected), vec!["react", "typescript"]);
        assert_eq!(selected[0].target_version, "19.0.0");
        assert_eq!(selected[1].target_version, "5.8.0");
    }

    #[test]
    fn test_select_all() {
        let mut prompt = prompt("a\n");
        let selected = prompt.select(&candidates()).unwrap();
        assert_eq!(names(&selected), vec!["react", "lodash", "typescript"]);
    }

    #[test]
    fn test_select_reprompts_on_invalid_input() {
        let mut prompt = prompt("9\n2\n");
        let selected = prompt.select(&candidates()).unwrap();
        assert_eq!(names(&selected), vec!["lodash"]);

        let output = String::from_utf8(prompt.into_writer()).unwrap();
        assert!(output.contains("Invalid selection: '9' is not a number between 1 and 3"));
    }

    #[test]
    fn test_select_eof_selects_nothing() {
        let mut prompt = prompt("");
        assert!(prompt.select(&candidates()).unwrap().is_empty());
    }

    #[test]
    fn test_select_without_candidates_reads_nothing() {
        let mut prompt = prompt("a\n");
        assert!(prompt.select(&[]).unwrap().is_empty());
        assert!(prompt.into_writer().is_empty());
    }

    #[test]
    fn test_confirm_defaults_to_yes() {
        let mut prompt = prompt("\n");
        assert!(prompt
            .confirm_apply(2, Path::new("/app/package.json"))
            .unwrap());
        let output = String::from_utf8(prompt.into_writer()).unwrap();
        assert!(output.contains("Apply 2 selected upgrade(s) to /app/package.json? [Y/n]"));
    }

    #[test]
    fn test_confirm_no() {
        let mut prompt = prompt("n\n");
        assert!(!prompt.confirm_apply(1, Path::new("package.json")).unwrap());
    }

    #[test]
    fn test_confirm_reprompts_then_accepts() {
        let mut prompt = prompt("maybe\nyes\n");
        assert!(prompt.confirm_apply(1, Path::new("package.json")).unwrap());
    }

    #[test]
    fn test_confirm_eof_declines() {
        let mut prompt = prompt("");
        assert!(!prompt.confirm_apply(1, Path::new("package.json")).unwrap());
    }
}
