//! Extended-DIMACS text ingestion: `p cnf`/`p cardls` headers, `c` comments,
//! plain clause lines, `k <bound>` general cardinality lines, and `o <var>
//! <weight>` objective lines, read transparently from gzip or plain text.

use std::collections::HashMap;
use std::io::{self, BufRead, Read};
use std::{fs, path};

use flate2::read::GzDecoder;

use crate::sat::formula::{Lit, Var, VarMap};
use crate::sat::local_search::config::ConfigError;
use crate::sat::local_search::problem::Problem;

/// The ingested problem plus the id tables needed to report results back
/// in terms of the caller's original (possibly sparse) variable numbering.
pub struct Parsed {
    pub problem: Problem,
    pub backward_subst: VarMap<i32>,
}

/// Reads `path`, transparently decompressing gzip input. Detects gzip by
/// its two-byte magic number rather than by trying and failing to parse a
/// `GzDecoder` as a header (`flate2`'s `GzDecoder` no longer fails eagerly
/// at construction, only lazily on the first read).
pub fn parse_file<P: AsRef<path::Path>>(path: P, strict: bool) -> io::Result<Parsed> {
    let mut magic = [0u8; 2];
    let is_gzip = {
        let mut probe = fs::File::open(&path)?;
        let n = probe.read(&mut magic)?;
        n == 2 && magic == [0x1f, 0x8b]
    };

    let file = fs::File::open(&path)?;
    if is_gzip {
        parse(io::BufReader::new(GzDecoder::new(file)), strict)
    } else {
        parse(io::BufReader::new(file), strict)
    }
}

pub fn parse<R: Read>(reader: R, strict: bool) -> io::Result<Parsed> {
    let mut subst = Subst::new();
    let mut problem = Problem::new();
    let mut declared_vars = 0usize;
    let mut declared_items = 0usize;
    let mut parsed_items = 0usize;
    let mut header_seen = false;

    for line in io::BufReader::new(reader).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }

        let mut words = line.split_whitespace();
        match words.next() {
            Some("p") => {
                let _kind = words.next().ok_or_else(|| parse_error("missing header kind"))?;
                declared_vars = parse_usize(words.next(), "header var count")?;
                declared_items = parse_usize(words.next(), "header item count")?;
                header_seen = true;
            }
            Some("o") => {
                let var_id = parse_i32(words.next(), "objective var id")?;
                let weight = parse_i64(words.next(), "objective weight")?;
                let var = subst.var_for(var_id, &mut problem);
                problem.add_soft(var, weight);
            }
            Some("k") => {
                let k = parse_i64(words.next(), "cardinality bound")?;
                let lits = parse_literal_run(words)?;
                let resolved: Vec<Lit> = lits.into_iter().map(|l| subst.lit_for(l, &mut problem)).collect();
                problem
                    .add_cardinality(&resolved, k)
                    .map_err(config_error_to_io)?;
                parsed_items += 1;
            }
            Some(first) => {
                let mut lits = vec![first.parse::<i32>().map_err(|_| parse_error("expected literal or directive"))?];
                lits.extend(parse_literal_run(words)?);
                let resolved: Vec<Lit> = lits.into_iter().map(|l| subst.lit_for(l, &mut problem)).collect();
                problem.add_clause(&resolved).map_err(config_error_to_io)?;
                parsed_items += 1;
            }
            None => {}
        }
    }

    if strict && header_seen {
        if declared_items != parsed_items {
            return Err(parse_error(&format!(
                "DIMACS header mismatch: {} items declared, {} found",
                declared_items, parsed_items
            )));
        }
        if declared_vars < subst.forward_subst.len() {
            return Err(parse_error(&format!(
                "DIMACS header mismatch: {} vars declared, {} discovered",
                declared_vars,
                subst.forward_subst.len()
            )));
        }
    }

    Ok(Parsed { problem, backward_subst: subst.backward_subst })
}

/// Reads the remaining signed integers of a line up to (and excluding) the
/// trailing `0`.
fn parse_literal_run<'a, I: Iterator<Item = &'a str>>(words: I) -> io::Result<Vec<i32>> {
    let mut lits = Vec::new();
    for w in words {
        let n: i32 = w.parse().map_err(|_| parse_error("expected a signed integer"))?;
        if n == 0 {
            return Ok(lits);
        }
        lits.push(n);
    }
    Err(parse_error("clause/constraint line missing terminating 0"))
}

fn parse_usize(s: Option<&str>, what: &str) -> io::Result<usize> {
    s.and_then(|s| s.parse().ok()).ok_or_else(|| parse_error(&format!("expected {}", what)))
}

fn parse_i32(s: Option<&str>, what: &str) -> io::Result<i32> {
    s.and_then(|s| s.parse().ok()).ok_or_else(|| parse_error(&format!("expected {}", what)))
}

fn parse_i64(s: Option<&str>, what: &str) -> io::Result<i64> {
    s.and_then(|s| s.parse().ok()).ok_or_else(|| parse_error(&format!("expected {}", what)))
}

fn parse_error(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("PARSE ERROR! {}", msg))
}

fn config_error_to_io(e: ConfigError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
}

/// Writes the best model found as a DIMACS-style model line (`v <ids> 0`),
/// translating internal variables back to the caller's external ids.
pub fn write_model<W: io::Write>(stream: &mut W, backward_subst: &VarMap<i32>, model: &[bool]) -> io::Result<()> {
    write!(stream, "v ")?;
    for (i, &val) in model.iter().enumerate().skip(1) {
        let var = Var::new(i);
        if let Some(&var_id) = backward_subst.get(&var) {
            write!(stream, "{} ", if val { var_id } else { -var_id })?;
        }
    }
    writeln!(stream, "0")
}

/// Maps external (possibly sparse, possibly negative-signed) variable ids
/// to dense internal `Var`s, growing `Problem` as new ids are discovered.
struct Subst {
    forward_subst: HashMap<i32, Var>,
    backward_subst: VarMap<i32>,
}

impl Subst {
    fn new() -> Self {
        Subst { forward_subst: HashMap::new(), backward_subst: VarMap::new() }
    }

    fn var_for(&mut self, var_id: i32, problem: &mut Problem) -> Var {
        let key = var_id.abs();
        if let Some(&v) = self.forward_subst.get(&key) {
            return v;
        }
        let v = problem.new_var();
        self.forward_subst.insert(key, v);
        self.backward_subst.insert(&v, key);
        v
    }

    fn lit_for(&mut self, lit_id: i32, problem: &mut Problem) -> Lit {
        self.var_for(lit_id, problem).lit(lit_id < 0)
    }
}
