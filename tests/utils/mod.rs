use regex as rust_regex;
use regvm::{Engine, Regex};

const ENGINES: [Engine; 3] = [Engine::Recursive, Engine::Backtrack, Engine::PikeVM];

/// Compile a given pattern on all regvm engines. Return Some if it compiles
/// for all engines, or None if it fails to compile for all of them. Panics if
/// an inconsistency is detected.
pub fn compile_all(pattern: &str) -> Option<Vec<Regex>> {
    let results: Vec<_> = ENGINES
        .iter()
        .map(|engine| regvm::Builder::new(pattern).engine(*engine).build())
        .collect();
    if results.iter().all(Result::is_err) {
        return None;
    }
    Some(
        results
            .into_iter()
            .map(|re| re.expect("Inconsistency detected"))
            .collect(),
    )
}

type Groups = Option<Vec<Option<(usize, usize)>>>;

/// Runs every engine and checks they all report the same captures.
pub fn captures_all(pattern: &str, input: &str) -> Groups {
    let engines = compile_all(pattern).expect("pattern should compile");
    let mut results = engines.iter().map(|re| {
        re.find_captures(input)
            .expect("should not reach the thread limit")
            .map(|caps| {
                caps.iter()
                    .map(|m| m.map(|m| (m.span.from, m.span.to)))
                    .collect::<Vec<_>>()
            })
    });
    let first = results.next().unwrap();
    for (other, engine) in results.zip(&ENGINES[1..]) {
        assert_eq!(
            first, other,
            "Mismatch between engines for pattern {:?} input {:?} ({:?})",
            pattern, input, engine
        );
    }
    first
}

/// Match a pattern against a given input on all engines, including
/// rust-regex, and compare the result of both compilation and execution.
///
/// Our matches are anchored at the start of the input and prefer the
/// alternatives in pattern order, which is what rust-regex does for
/// `^(?:pattern)`.
pub fn check_all_engines(pattern: &str, input: &str) {
    let rust = rust_regex::Regex::new(&format!("^(?:{pattern})"));
    let ours = compile_all(pattern);

    match (rust, ours) {
        (Ok(rust_re), Some(_)) => {
            let rust_groups = rust_re.captures(input).map(|caps| {
                (0..caps.len())
                    .map(|i| caps.get(i).map(|m| (m.start(), m.end())))
                    .collect::<Vec<_>>()
            });
            let my_groups = captures_all(pattern, input);
            assert_eq!(
                my_groups, rust_groups,
                "Mismatch for pattern {:?} input {:?} (find_captures)",
                pattern, input
            );
        }
        (Err(_), None) => {} // All failed, that's good
        (Ok(_), None) => {} // Outside of our grammar
        (Err(e), Some(_)) => panic!("rust-regex failed to compile but our engines succeeded: {e}"),
    }
}
