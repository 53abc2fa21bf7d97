use std::collections::BTreeSet;

use valifa_util::field_tokens;

use crate::{
    validate_nfa, Dfa, DfaRequest, DfaVerdict, MissingField, Nfa, NfaOutcome, NfaRequest,
    StateName, StateSet, TransitionGrid, NFA_ALPHABET,
};

// cells are (state, symbol, text), placed by the position of their tokens in the fields
fn grid(states: &str, symbols: &[&str], cells: &[(&str, &str, &str)]) -> TransitionGrid {
    let states = field_tokens(states);
    let mut grid = TransitionGrid::new(states.len(), symbols.len());
    for (state, symbol, text) in cells {
        let row = states.iter().position(|s| s == state).expect("unknown row");
        let column = symbols.iter().position(|s| s == symbol).expect("unknown column");
        grid.set(row, column, *text);
    }
    grid
}

fn compile_dfa(states: &str, alphabet: &str, cells: &[(&str, &str, &str)], accepting: &str) -> Dfa {
    let grid = grid(states, &field_tokens(alphabet), cells);
    let request = DfaRequest::from_fields(states, alphabet, grid, accepting, "")
        .expect("failed to build request");
    Dfa::from_request(&request)
}

fn nfa_request(states: &str, cells: &[(&str, &str, &str)], single: &str, subset: &str) -> NfaRequest {
    let grid = grid(states, &["a", "λ"], cells);
    NfaRequest::from_fields(states, grid, "", single, subset)
}

fn run_vectors(tests: &Vec<(&str, bool)>, dfa: &Dfa, name: &str) {
    for (test, expected_result) in tests {
        let run = dfa.accepts(test);
        assert!(run.completed(), "'{}' got stuck on input '{}': {:?}", name, test, run.verdict);
        let result = run.is_accepted();
        assert_eq!(
            result, *expected_result,
            "'{}' failed on input '{}', expect accept: {}, actual accept: {}",
            name, test, expected_result, result
        );
    }
}

fn names(set: &StateSet, nfa: &Nfa) -> BTreeSet<String> {
    set.names(nfa.states()).map(|name| name.to_string()).collect()
}

fn alternating() -> Dfa {
    compile_dfa(
        "q0 q1",
        "a b",
        &[("q0", "a", "q1"), ("q0", "b", "q0"), ("q1", "a", "q1"), ("q1", "b", "q0")],
        "q1",
    )
}

#[test]
fn ends_in_a() {
    let dfa = alternating();

    let test_vectors = vec![
        ("aba", true),
        ("b", false),
        ("a", true),
        ("ab", false),
        ("bbbba", true),
        ("aaaab", false),
    ];

    run_vectors(&test_vectors, &dfa, "ends in a")
}

#[test]
fn aba_trace() {
    let run = alternating().accepts("aba");
    let trace: Vec<&str> = run.trace.iter().map(StateName::as_str).collect();
    assert_eq!(trace, vec!["q0", "q1", "q0", "q1"]);
    assert_eq!(run.verdict, DfaVerdict::Accepted);
}

#[test]
fn missing_entry_is_invalid_transition() {
    let dfa = compile_dfa("q0 q1", "a b", &[("q0", "a", "q1")], "q1");
    assert!(matches!(
        dfa.accepts("b").verdict,
        DfaVerdict::RejectedInvalidTransition { position: 0, .. }
    ));

    // the run stops at the first gap, later symbols are never looked at
    let run = dfa.accepts("abbbb");
    assert!(matches!(run.verdict, DfaVerdict::RejectedInvalidTransition { position: 1, .. }));
    assert_eq!(run.trace.len(), 2);
}

#[test]
fn symbols_outside_the_alphabet_get_stuck() {
    let run = alternating().accepts("ac");
    assert!(matches!(run.verdict, DfaVerdict::RejectedInvalidTransition { .. }));
}

#[test]
fn runs_are_pure() {
    let dfa = alternating();
    for input in ["aba", "b", "abc", "bbbbbbbba"] {
        assert_eq!(dfa.accepts(input), dfa.accepts(input));
    }
}

#[test]
fn no_accepting_states_never_accepts() {
    let dfa = compile_dfa("q0", "a", &[("q0", "a", "q0")], "");
    for input in ["a", "aa", "aaaaaaa"] {
        assert_eq!(
            dfa.accepts(input).verdict,
            DfaVerdict::MissingInput(MissingField::AcceptingStates)
        );
    }
}

// binary numbers divisible by three
#[test]
fn complete_dfa_never_gets_stuck() {
    let dfa = compile_dfa(
        "r0 r1 r2",
        "0 1",
        &[
            ("r0", "0", "r0"),
            ("r0", "1", "r1"),
            ("r1", "0", "r2"),
            ("r1", "1", "r0"),
            ("r2", "0", "r1"),
            ("r2", "1", "r2"),
        ],
        "r0",
    );

    for length in 1..=6 {
        for value in 0u32..(1 << length) {
            let input = format!("{:0width$b}", value, width = length);
            let run = dfa.accepts(&input);
            assert!(run.completed(), "stuck on {}", input);
            assert_eq!(run.is_accepted(), value % 3 == 0, "wrong verdict for {}", input);
        }
    }
}

#[test]
fn single_state_scenario() {
    let request = nfa_request("q0 q1 q2", &[("q0", "a", "q1"), ("q1", "λ", "q2")], "q0", "q0");
    let mut nfa = Nfa::from_request(&request);
    let q0 = nfa.state_set(&[StateName::from("q0")]);

    let pre = nfa.epsilon_closure(&q0);
    assert_eq!(names(&pre, &nfa), BTreeSet::from(["q0".to_string()]));

    let stepped = nfa.step(&pre, NFA_ALPHABET[0]);
    assert_eq!(names(&stepped, &nfa), BTreeSet::from(["q1".to_string()]));

    let post = nfa.extended_transition(&q0);
    assert_eq!(names(&post, &nfa), BTreeSet::from(["q1".to_string(), "q2".to_string()]));
}

#[test]
fn subset_scenario() {
    let request = nfa_request(
        "q0 q1 q2 q3",
        &[("q0", "a", "q1"), ("q1", "λ", "q2"), ("q2", "λ", "q3")],
        "q0",
        "{q0, q2}",
    );

    let report = validate_nfa(&request);
    let NfaOutcome::Computed { single, subset } = &report.outcome else {
        panic!("expected closures, got {:?}", report.outcome);
    };

    assert_eq!(single.reached_set(), BTreeSet::from(["q1", "q2", "q3"]));
    // q2 only reaches q3 by epsilon before the step, and neither moves on `a`
    assert_eq!(subset.reached_set(), BTreeSet::from(["q1", "q2", "q3"]));
}

fn closure_fixtures() -> Vec<Nfa> {
    let fixtures = [
        nfa_request("q0 q1 q2 q3", &[("q0", "λ", "q1"), ("q1", "λ", "q2, q3")], "", ""),
        nfa_request(
            "q0 q1 q2 q3",
            &[("q0", "λ", "q1"), ("q1", "λ", "q0"), ("q2", "a", "q3")],
            "",
            "",
        ),
        nfa_request("q0 q1 q2 q3", &[("q3", "λ", "q3"), ("q0", "a", "q0 q1")], "", ""),
        nfa_request("q0 q1 q2 q3", &[], "", ""),
    ];

    fixtures.iter().map(Nfa::from_request).collect()
}

// every subset of the declared states
fn subsets(nfa: &Nfa) -> Vec<StateSet> {
    let declared: Vec<_> = nfa
        .states()
        .iter()
        .filter(|idx| nfa.states().is_declared(*idx))
        .collect();
    (0u32..(1 << declared.len()))
        .map(|mask| {
            declared
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << *bit) != 0)
                .map(|(_, idx)| *idx)
                .collect()
        })
        .collect()
}

#[test]
fn closure_is_idempotent_and_monotonic() {
    for nfa in closure_fixtures() {
        for set in subsets(&nfa) {
            let closure = nfa.epsilon_closure(&set);
            assert!(set.is_subset(&closure), "{:?} not within {:?}", set, closure);
            assert_eq!(
                names(&nfa.epsilon_closure(&closure), &nfa),
                names(&closure, &nfa),
                "closure of {:?} is not a fixed point",
                set
            );
        }
    }
}

#[test]
fn subset_order_does_not_matter() {
    let cells = [("q0", "a", "q1"), ("q1", "λ", "q2"), ("q2", "a", "q0"), ("q3", "λ", "q0")];
    let orders = ["q0 q2 q3", "{q3, q2, q0}", "q2,q0,q3", "q3 q0 q2 q0"];

    let results: Vec<BTreeSet<String>> = orders
        .iter()
        .map(|order| {
            let report = validate_nfa(&nfa_request("q0 q1 q2 q3", &cells, "q0", order));
            match report.outcome {
                NfaOutcome::Computed { subset, .. } => {
                    subset.reached_set().into_iter().map(str::to_string).collect()
                }
                outcome => panic!("expected closures, got {:?}", outcome),
            }
        })
        .collect();

    assert!(results.windows(2).all(|pair| pair[0] == pair[1]), "{:?}", results);
    assert_eq!(
        results[0],
        BTreeSet::from(["q0".to_string(), "q1".to_string(), "q2".to_string()])
    );
}

#[test]
fn empty_closure_formats_as_empty_list() {
    let report = validate_nfa(&nfa_request("q0 q1", &[("q1", "a", "q0")], "q0", "q0"));
    let NfaOutcome::Computed { single, .. } = &report.outcome else {
        panic!("expected closures, got {:?}", report.outcome);
    };
    assert!(single.reached.is_empty());
    assert_eq!(single.joined(), "");
    assert!(report.outcome.to_string().contains("ETD of q0 : \n"));
}
