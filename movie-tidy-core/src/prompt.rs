use crate::resolver::CandidateName;
use std::io::{self, BufRead, Write};

/// Source of operator input, one line per selection attempt.
pub trait LineSource {
    /// Next line, or `None` once the input is exhausted.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

// Bytes that are not UTF-8 become replacement characters and fail to parse
// as a number like any other junk.
impl<R: BufRead> LineSource for R {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        if self.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Chosen(String),
    /// Operator entered `0`, or input ended before a valid choice.
    Cancelled,
}

#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Pick(usize),
    Cancel,
    NotANumber,
    OutOfRange,
}

fn parse_selection(line: &str, count: usize) -> Selection {
    let trimmed = line.trim();
    let number = if trimmed.is_empty() {
        1
    } else {
        match trimmed.parse::<i64>() {
            Ok(n) => n,
            Err(_) => return Selection::NotANumber,
        }
    };

    if number == 0 {
        return Selection::Cancel;
    }

    match usize::try_from(number) {
        Ok(n) if n <= count => Selection::Pick(n - 1),
        _ => Selection::OutOfRange,
    }
}

/// Pick one of `candidates`.
///
/// A single candidate is taken as-is unless `manual_mode` is set. Otherwise
/// the list is printed 1-indexed and lines are read until one selects an
/// entry: a blank line means `1`, `0` cancels, anything else re-prompts.
pub fn decide<L, W>(
    candidates: &[CandidateName],
    manual_mode: bool,
    input: &mut L,
    out: &mut W,
) -> io::Result<Decision>
where
    L: LineSource + ?Sized,
    W: Write + ?Sized,
{
    if candidates.len() == 1 && !manual_mode {
        return Ok(Decision::Chosen(candidates[0].custom_name.clone()));
    }

    writeln!(out, "0 : cancel")?;
    for (idx, candidate) in candidates.iter().enumerate() {
        writeln!(out, "{} : {}", idx + 1, candidate.custom_name)?;
    }
    writeln!(out, "Select an option (press Enter for 1):")?;
    out.flush()?;

    loop {
        let Some(line) = input.next_line()? else {
            tracing::debug!("input closed while prompting");
            return Ok(Decision::Cancelled);
        };

        match parse_selection(&line, candidates.len()) {
            Selection::Pick(idx) => {
                return Ok(Decision::Chosen(candidates[idx].custom_name.clone()));
            },
            Selection::Cancel => return Ok(Decision::Cancelled),
            Selection::NotANumber => writeln!(out, "Please enter a number!")?,
            Selection::OutOfRange => writeln!(out, "Please enter a valid option!")?,
        }
        out.flush()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    fn candidates(names: &[&str]) -> Vec<CandidateName> {
        names
            .iter()
            .map(|n| CandidateName {
                custom_name: (*n).to_string(),
            })
            .collect()
    }

    fn run(names: &[&str], manual: bool, input: &str) -> (Decision, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let decision = decide(&candidates(names), manual, &mut reader, &mut out).unwrap();
        (decision, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_candidate_auto_selects_without_output() {
        let (decision, out) = run(&["Movie (2020).mkv"], false, "");
        assert_eq!(decision, Decision::Chosen("Movie (2020).mkv".to_string()));
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_candidate_manual_mode_prompts() {
        let (decision, out) = run(&["Movie (2020).mkv"], true, "1\n");
        assert_eq!(decision, Decision::Chosen("Movie (2020).mkv".to_string()));
        assert!(out.contains("0 : cancel"));
        assert!(out.contains("1 : Movie (2020).mkv"));
    }

    #[test]
    fn test_blank_line_selects_first() {
        let (decision, _) = run(&["A", "B"], false, "\n");
        assert_eq!(decision, Decision::Chosen("A".to_string()));

        let (decision, _) = run(&["A", "B"], false, "   \r\n");
        assert_eq!(decision, Decision::Chosen("A".to_string()));
    }

    #[test]
    fn test_menu_is_one_indexed() {
        let (decision, out) = run(&["A", "B", "C"], false, "3\n");
        assert_eq!(decision, Decision::Chosen("C".to_string()));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[..4], ["0 : cancel", "1 : A", "2 : B", "3 : C"]);
    }

    #[test]
    fn test_non_numeric_reprompts() {
        let (decision, out) = run(&["A", "B"], false, "abc\n2\n");
        assert_eq!(decision, Decision::Chosen("B".to_string()));
        assert_eq!(out.matches("Please enter a number!").count(), 1);
    }

    #[test]
    fn test_invalid_utf8_reprompts() {
        let mut reader = Cursor::new(b"\xff\xfe\n2\n".to_vec());
        let mut out = Vec::new();
        let decision = decide(&candidates(&["A", "B"]), true, &mut reader, &mut out).unwrap();
        assert_eq!(decision, Decision::Chosen("B".to_string()));
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("Please enter a number!").count(), 1);
    }

    #[test]
    fn test_out_of_range_reprompts() {
        let (decision, out) = run(&["A", "B"], false, "3\n-1\n2\n");
        assert_eq!(decision, Decision::Chosen("B".to_string()));
        assert_eq!(out.matches("Please enter a valid option!").count(), 2);
    }

    #[test]
    fn test_zero_cancels() {
        let (decision, _) = run(&["A", "B"], false, "0\n");
        assert_eq!(decision, Decision::Cancelled);
    }

    #[test]
    fn test_end_of_input_cancels() {
        let (decision, _) = run(&["A", "B"], false, "x\n");
        assert_eq!(decision, Decision::Cancelled);
    }

    #[test]
    fn test_no_candidates_can_only_cancel() {
        let (decision, out) = run(&[], false, "\n1\n0\n");
        assert_eq!(decision, Decision::Cancelled);
        assert_eq!(out.matches("Please enter a valid option!").count(), 2);
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("", 2), Selection::Pick(0));
        assert_eq!(parse_selection(" 2 \n", 2), Selection::Pick(1));
        assert_eq!(parse_selection("+1", 2), Selection::Pick(0));
        assert_eq!(parse_selection("0", 2), Selection::Cancel);
        assert_eq!(parse_selection("3", 2), Selection::OutOfRange);
        assert_eq!(parse_selection("-4", 2), Selection::OutOfRange);
        assert_eq!(parse_selection("1.5", 2), Selection::NotANumber);
        assert_eq!(parse_selection("one", 2), Selection::NotANumber);
    }

    fn noise(count: usize) -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z]{1,8}".prop_map(|s| s),
            ((count as i64 + 1)..10_000i64).prop_map(|n| n.to_string()),
            (-10_000i64..0).prop_map(|n| n.to_string()),
        ]
    }

    proptest! {
        #[test]
        fn prop_valid_numeral_eventually_chosen(
            (count, pick, junk) in (1usize..8).prop_flat_map(|count| {
                (Just(count), 1..=count, prop::collection::vec(noise(count), 0..6))
            })
        ) {
            let names: Vec<String> = (0..count).map(|i| format!("Name {i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();

            let mut input = junk.join("\n");
            if !input.is_empty() {
                input.push('\n');
            }
            input.push_str(&format!("{pick}\n"));

            let (decision, _) = run(&refs, true, &input);
            prop_assert_eq!(decision, Decision::Chosen(names[pick - 1].clone()));
        }
    }
}
