use std::{env, fs, path::Path};

/// Log to cargo's warning output
///
/// Only enabled if environment variable "LOG" is set.
///
/// ```
/// LOG=1 cargo build
/// ```
///
macro_rules! log {
    ($($tokens: tt)*) => {
        env::var("LOG")
            .and_then(|_| Ok(print!("cargo:warning={}\n", format!($($tokens)*))))
            .unwrap_or_default();
    }
}

const DEFAULT_UNROLL_LENGTH: usize = 8;

/// Lengths strictly below this threshold are evaluated by straight-line,
/// fully unrolled update statements instead of a runtime loop.
fn unroll_length() -> usize {
    env::var("FIXVEC_UNROLL_LENGTH")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_UNROLL_LENGTH)
}

fn generate_unrolled(unroll: usize) -> String {
    let mut src = String::new();

    src.push_str("// Generated by build.rs. Set FIXVEC_UNROLL_LENGTH to reconfigure.\n\n");
    src.push_str("/// Lengths strictly below this threshold are evaluated by straight-line,\n");
    src.push_str("/// fully unrolled update statements instead of a runtime loop.\n");
    src.push_str(&format!("pub const UNROLL_LENGTH: usize = {};\n\n", unroll));
    src.push_str("#[inline(always)]\n");
    src.push_str("pub(crate) fn unrolled<T, E, U, const N: usize>(data: &mut [T; N], expr: &E)\n");
    src.push_str("where\n");
    src.push_str("    T: Scalar,\n");
    src.push_str("    E: Expr<N>,\n");
    src.push_str("    U: Update<T, E::Output>,\n");
    src.push_str("{\n");
    src.push_str("    // re-borrowed as a slice so unmatched arms carry no constant indices\n");
    src.push_str("    let data = data.as_mut_slice();\n");
    src.push_str("    match N {\n");
    for n in 0..unroll {
        if n == 0 {
            src.push_str("        0 => {}\n");
            continue;
        }
        src.push_str(&format!("        {} => {{\n", n));
        for i in 0..n {
            src.push_str(&format!(
                "            U::update(&mut data[{i}], expr.read({i}));\n"
            ));
        }
        src.push_str("        }\n");
    }
    src.push_str("        _ => {\n");
    src.push_str("            for i in 0..N {\n");
    src.push_str("                U::update(&mut data[i], expr.read(i));\n");
    src.push_str("            }\n");
    src.push_str("        }\n");
    src.push_str("    }\n");
    src.push_str("}\n");

    src
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=FIXVEC_UNROLL_LENGTH");

    let unroll = unroll_length();
    log!("unroll threshold set to {}", unroll);

    let out = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let path = Path::new(&out).join("unrolled.rs");
    fs::write(&path, generate_unrolled(unroll)).expect("Unable to write generated evaluator");
}
