//! Deterministic solver for a narrow class of math prompts.
//!
//! Recognizes two canonical phrasings — "does a/b have a terminating
//! decimal expansion" and "is X rational or irrational" — and answers
//! them exactly with integer arithmetic, so the orchestrator can skip
//! the AI providers entirely. Anything else is reported as no match
//! (`None`), never as an error; the caller falls through to the AI path.

use std::sync::LazyLock;

use regex::Regex;

static FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*/\s*(\d+)").expect("valid regex"));
static BARE_FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)\s*/\s*(\d+)\b").expect("valid regex"));
static SQRT_FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sqrt\s*\(\s*(\d+)\s*/\s*(\d+)\s*\)").expect("valid regex"));
static SQRT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sqrt\s*\(\s*(\d+)\s*\)").expect("valid regex"));
static ROOT_SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"√\s*(\d+)").expect("valid regex"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+)(?:\.(\d+))?").expect("valid regex"));
static WORD_E_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\be\b").expect("valid regex"));

/// Which canonical phrasing the solver matched. Used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverPattern {
    TerminatingDecimal,
    Rationality,
}

impl SolverPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolverPattern::TerminatingDecimal => "terminating_decimal",
            SolverPattern::Rationality => "rationality",
        }
    }
}

/// An exact solution with its derivation, one step per line.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkedSolution {
    pub pattern: SolverPattern,
    pub steps: Vec<String>,
}

impl WorkedSolution {
    fn new(pattern: SolverPattern, steps: Vec<String>) -> Self {
        Self { pattern, steps }
    }

    /// The user-facing solution text.
    pub fn text(&self) -> String {
        self.steps.join("\n")
    }
}

/// Attempt to answer a prompt locally.
///
/// Returns `None` when the prompt matches neither recognized phrasing or
/// the matched phrasing carries no usable numeric token.
pub fn try_solve(prompt: &str) -> Option<WorkedSolution> {
    let text = prompt.to_lowercase();
    if text.trim().is_empty() {
        return None;
    }
    let compact: String = text.split_whitespace().collect();

    let wants_terminating = (text.contains("terminating") && text.contains("decimal"))
        || compact.contains("terminatingdecimalexpansion");
    if wants_terminating {
        if let Some(solution) = check_terminating_decimal(&text) {
            return Some(solution);
        }
    }

    let wants_rationality = (text.contains("rational") && text.contains("irrational"))
        || compact.contains("rationalorirrational");
    if wants_rationality {
        if let Some(solution) = classify_rationality(&text, &compact) {
            return Some(solution);
        }
    }

    None
}

/// "Does a/b have a terminating decimal expansion?"
///
/// A reduced fraction terminates iff its denominator has no prime factors
/// other than 2 and 5: reduce by gcd, strip 2s and 5s, check whether 1
/// remains.
fn check_terminating_decimal(text: &str) -> Option<WorkedSolution> {
    let caps = FRACTION_RE.captures(text)?;
    let num: u64 = caps[1].parse().ok()?;
    let den: u64 = caps[2].parse().ok()?;
    if den == 0 {
        return Some(undefined_denominator(SolverPattern::TerminatingDecimal));
    }

    let g = gcd(num, den);
    let (num_r, den_r) = (num / g, den / g);
    let remaining = strip_factor(strip_factor(den_r, 2), 5);

    let mut steps = vec![
        format!("Given fraction: {}/{}", &caps[1], &caps[2]),
        format!("Reduce to lowest terms: {num_r}/{den_r} (gcd = {g})"),
        "A fraction has a terminating decimal exactly when its reduced denominator \
         has no prime factors other than 2 and 5."
            .to_string(),
        format!("Remove factors 2 and 5 from {den_r}: remaining = {remaining}."),
    ];
    steps.push(if remaining == 1 {
        "Since remaining = 1, the decimal expansion terminates.".to_string()
    } else {
        "Since remaining ≠ 1, the decimal expansion is non-terminating repeating.".to_string()
    });
    Some(WorkedSolution::new(SolverPattern::TerminatingDecimal, steps))
}

/// "Is X rational or irrational?" — rules tried in order, first match wins.
fn classify_rationality(text: &str, compact: &str) -> Option<WorkedSolution> {
    if let Some(caps) = SQRT_FRACTION_RE
        .captures(text)
        .or_else(|| SQRT_FRACTION_RE.captures(compact))
    {
        return classify_sqrt_fraction(caps[1].parse().ok()?, caps[2].parse().ok()?);
    }

    if let Some(caps) = SQRT_RE
        .captures(text)
        .or_else(|| SQRT_RE.captures(compact))
        .or_else(|| ROOT_SYMBOL_RE.captures(text))
    {
        return classify_sqrt(caps[1].parse().ok()?);
    }

    if text.contains("pi") || text.contains("π") {
        return Some(rationality_verdict(
            "π (pi) is a known irrational number. Therefore it is irrational.",
        ));
    }
    if WORD_E_RE.is_match(text) {
        return Some(rationality_verdict(
            "e (Euler's number) is a known irrational number. Therefore it is irrational.",
        ));
    }

    if let Some(caps) = BARE_FRACTION_RE.captures(text) {
        let den: u64 = caps[2].parse().ok()?;
        if den == 0 {
            return Some(undefined_denominator(SolverPattern::Rationality));
        }
        return Some(rationality_verdict(&format!(
            "Given: {}/{}. Any ratio of integers with a non-zero denominator is rational.",
            &caps[1], &caps[2]
        )));
    }

    if let Some(caps) = NUMBER_RE.captures(text) {
        let step = if caps.get(2).is_some() {
            format!(
                "The finite decimal {} can be written as a fraction over a power of 10, \
                 hence it is rational.",
                &caps[0]
            )
        } else {
            format!("The integer {} is rational (equal to {}/1).", &caps[1], &caps[1])
        };
        return Some(rationality_verdict(&step));
    }

    None
}

fn classify_sqrt_fraction(a: u64, b: u64) -> Option<WorkedSolution> {
    if b == 0 {
        return Some(undefined_denominator(SolverPattern::Rationality));
    }
    let g = gcd(a, b);
    let (ar, br) = (a / g, b / g);

    let mut steps = vec![
        format!("Given: sqrt({a}/{b})"),
        format!("Reduce the fraction inside the root: {a}/{b} = {ar}/{br} (gcd = {g})."),
    ];
    let num_root = perfect_sqrt(ar);
    let den_root = perfect_sqrt(br);
    steps.push(format!(
        "Check perfect squares: numerator {ar} {} a perfect square; denominator {br} {} a perfect square.",
        if num_root.is_some() { "is" } else { "is not" },
        if den_root.is_some() { "is" } else { "is not" },
    ));
    match (num_root, den_root) {
        (Some(rn), Some(rd)) => steps.push(format!(
            "sqrt({ar}/{br}) = sqrt({ar})/sqrt({br}) = {rn}/{rd}, which is rational."
        )),
        _ => steps.push(format!(
            "Since the reduced numerator and denominator are not both perfect squares, \
             sqrt({ar}/{br}) is irrational."
        )),
    }
    Some(WorkedSolution::new(SolverPattern::Rationality, steps))
}

fn classify_sqrt(n: u64) -> Option<WorkedSolution> {
    let mut steps = vec![format!("Given: sqrt({n})")];
    match perfect_sqrt(n) {
        Some(r) => steps.push(format!(
            "{n} is a perfect square ({r}×{r}). Hence sqrt({n}) = {r}, which is rational."
        )),
        None => steps.push(format!(
            "{n} is not a perfect square. Therefore sqrt({n}) is irrational."
        )),
    }
    Some(WorkedSolution::new(SolverPattern::Rationality, steps))
}

fn rationality_verdict(step: &str) -> WorkedSolution {
    WorkedSolution::new(SolverPattern::Rationality, vec![step.to_string()])
}

fn undefined_denominator(pattern: SolverPattern) -> WorkedSolution {
    WorkedSolution::new(pattern, vec!["Undefined: denominator is 0.".to_string()])
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Repeatedly divide out `factor` from `n`.
fn strip_factor(mut n: u64, factor: u64) -> u64 {
    while n != 0 && n % factor == 0 {
        n /= factor;
    }
    n
}

/// Exact integer square root test: `Some(r)` iff `r * r == n`.
///
/// The float estimate can be off by one near large squares, so the
/// neighborhood is checked with overflow-safe multiplication.
fn perfect_sqrt(n: u64) -> Option<u64> {
    let approx = (n as f64).sqrt() as u64;
    for root in approx.saturating_sub(1)..=approx.saturating_add(1) {
        if root.checked_mul(root) == Some(n) {
            return Some(root);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve_text(prompt: &str) -> String {
        try_solve(prompt).expect("prompt should match").text()
    }

    #[test]
    fn terminating_7_over_20() {
        let text = solve_text("Check whether 7/20 has a terminating decimal expansion");
        assert!(text.contains("Given fraction: 7/20"));
        assert!(text.contains("remaining = 1"));
        assert!(text.contains("the decimal expansion terminates"));
    }

    #[test]
    fn non_terminating_2_over_75() {
        let text = solve_text("Does 2/75 have a terminating decimal expansion?");
        assert!(text.contains("(gcd = 1)"));
        assert!(text.contains("remaining = 3"));
        assert!(text.contains("non-terminating repeating"));
    }

    #[test]
    fn terminating_shows_reduction() {
        let text = solve_text("does 4/8 have a terminating decimal expansion?");
        assert!(text.contains("1/2 (gcd = 4)"));
        assert!(text.contains("the decimal expansion terminates"));
    }

    #[test]
    fn zero_denominator_is_undefined() {
        let text = solve_text("does 5/0 have a terminating decimal expansion?");
        assert_eq!(text, "Undefined: denominator is 0.");
    }

    #[test]
    fn terminating_phrase_without_fraction_is_no_match() {
        assert_eq!(try_solve("Explain terminating decimal expansions"), None);
    }

    #[test]
    fn sqrt_fraction_rational() {
        let text = solve_text("Is sqrt(16/81) rational or irrational?");
        assert!(text.contains("sqrt(16)/sqrt(81) = 4/9"));
        assert!(text.contains("which is rational"));
    }

    #[test]
    fn sqrt_fraction_irrational() {
        let text = solve_text("Is sqrt(2/3) rational or irrational?");
        assert!(text.contains("is irrational"));
        // The square-root rule must win over the bare-fraction rule.
        assert!(!text.contains("ratio of integers"));
    }

    #[test]
    fn sqrt_fraction_reduces_first() {
        // 8/18 reduces to 4/9, both perfect squares.
        let text = solve_text("Is sqrt(8/18) rational or irrational?");
        assert!(text.contains("8/18 = 4/9 (gcd = 2)"));
        assert!(text.contains("2/3, which is rational"));
    }

    #[test]
    fn sqrt_perfect_square() {
        let text = solve_text("Is sqrt(49) rational or irrational?");
        assert!(text.contains("sqrt(49) = 7, which is rational"));
    }

    #[test]
    fn sqrt_non_perfect_square() {
        let text = solve_text("Is sqrt(50) rational or irrational?");
        assert!(text.contains("50 is not a perfect square"));
        assert!(text.contains("is irrational"));
    }

    #[test]
    fn root_symbol_form() {
        let text = solve_text("Is √50 rational or irrational?");
        assert!(text.contains("is irrational"));
    }

    #[test]
    fn loose_spacing_inside_sqrt() {
        let text = solve_text("is sqrt ( 16 / 81 ) rational or irrational?");
        assert!(text.contains("4/9"));
    }

    #[test]
    fn pi_is_irrational() {
        let text = solve_text("Is pi rational or irrational?");
        assert!(text.contains("π (pi)"));
        assert!(text.contains("irrational"));
    }

    #[test]
    fn euler_number_is_irrational() {
        let text = solve_text("Is e rational or irrational?");
        assert!(text.contains("Euler"));
    }

    #[test]
    fn bare_fraction_is_rational() {
        let text = solve_text("Is 22/7 rational or irrational?");
        assert!(text.contains("Given: 22/7"));
        assert!(text.contains("is rational"));
    }

    #[test]
    fn finite_decimal_is_rational() {
        let text = solve_text("Is 3.75 rational or irrational?");
        assert!(text.contains("finite decimal 3.75"));
        assert!(text.contains("power of 10"));
    }

    #[test]
    fn integer_is_rational() {
        let text = solve_text("Is 42 rational or irrational?");
        assert!(text.contains("42/1"));
    }

    #[test]
    fn pattern_labels() {
        let terminating = try_solve("is 1/2 a terminating decimal?").unwrap();
        assert_eq!(terminating.pattern, SolverPattern::TerminatingDecimal);
        assert_eq!(terminating.pattern.as_str(), "terminating_decimal");

        let rationality = try_solve("is 42 rational or irrational?").unwrap();
        assert_eq!(rationality.pattern, SolverPattern::Rationality);
    }

    #[test]
    fn unrelated_prompts_do_not_match() {
        assert_eq!(try_solve("What is the capital of France?"), None);
        assert_eq!(try_solve("Solve 2x + 3 = 7 for x"), None);
        assert_eq!(try_solve(""), None);
        assert_eq!(try_solve("   "), None);
    }

    #[test]
    fn rationality_phrase_without_operand_is_no_match() {
        assert_eq!(try_solve("rational or irrational, who can say?"), None);
    }

    #[test]
    fn gcd_and_strip_helpers() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 20), 1);
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(strip_factor(200, 2), 25);
        assert_eq!(strip_factor(25, 5), 1);
        assert_eq!(strip_factor(7, 2), 7);
    }

    #[test]
    fn perfect_sqrt_is_exact() {
        assert_eq!(perfect_sqrt(0), Some(0));
        assert_eq!(perfect_sqrt(1), Some(1));
        assert_eq!(perfect_sqrt(49), Some(7));
        assert_eq!(perfect_sqrt(50), None);
        // Large square where a naive float check could drift.
        assert_eq!(perfect_sqrt(999_966_000_289), Some(999_983));
        assert_eq!(perfect_sqrt(999_966_000_290), None);
    }
}
