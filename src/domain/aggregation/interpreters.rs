use std::path::Path;

use crate::domain::entities::process::ProcessSample;

const INTERPRETERS: &[&str] = &["python", "node", "ruby"];

const SCRIPT_EXTENSIONS: &[&str] = &["py", "js", "rb", "ts", "mjs", "cjs"];

fn is_interpreter(exec: &str) -> bool {
    let base = exec.rsplit('/').next().unwrap_or(exec);
    INTERPRETERS.iter().any(|i| base.starts_with(i))
}

fn looks_like_script(arg: &str) -> bool {
    if arg.starts_with('-') {
        return false;
    }
    arg.contains('/')
        || Path::new(arg)
            .extension()
            .is_some_and(|ext| SCRIPT_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Script argument of an interpreter command line, if there is one.
fn script_of(identity: &str) -> Option<(&str, &str)> {
    let mut parts = identity.split_whitespace();
    let exec = parts.next()?;
    if !is_interpreter(exec) {
        return None;
    }
    let script = parts.find(|p| looks_like_script(p))?;
    let interpreter = exec.rsplit('/').next().unwrap_or(exec);
    let script = script.rsplit('/').next().unwrap_or(script);
    Some((interpreter, script))
}

/// Whether the sample is an interpreter running a script file.
#[must_use]
pub fn is_script_process(sample: &ProcessSample) -> bool {
    script_of(&sample.identity).is_some()
}

/// `interpreter:script` for script processes, the executable name otherwise.
///
/// `/usr/bin/python3 -u /srv/worker.py` gives `python3:worker.py`.
#[must_use]
pub fn script_key(sample: &ProcessSample) -> String {
    script_of(&sample.identity).map_or_else(
        || sample.executable_name().to_string(),
        |(interpreter, script)| format!("{interpreter}:{script}"),
    )
}
