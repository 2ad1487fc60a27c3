use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;

use super::cnf::{Cnf, Lit};

pub fn to_dimacs(cnf: &Cnf) -> String {
    let mut out = String::new();
    out.push_str(&format!("p cnf {} {}\n", cnf.num_vars, cnf.clauses.len()));
    for clause in &cnf.clauses {
        for &lit in clause {
            out.push_str(&format!("{} ", lit_to_dimacs_int(lit)));
        }
        out.push_str("0\n");
    }
    out
}

pub fn load_cnf<P: AsRef<Path>>(path: P) -> Result<Cnf> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_dimacs_reader(BufReader::new(file))
}

pub fn parse_dimacs_str(src: &str) -> Result<Cnf> {
    parse_dimacs_reader(src.as_bytes())
}

/// Clauses may span lines; each one ends at a `0` token. A header is
/// optional, but when present the variable bound is enforced.
pub fn parse_dimacs_reader<R: BufRead>(reader: R) -> Result<Cnf> {
    let mut cnf = Cnf::new(0);
    let mut header: Option<(u32, usize)> = None;
    let mut pending = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') || line.starts_with('%') {
            continue;
        }
        if line.starts_with('p') {
            if header.is_some() {
                bail!("line {}: duplicate problem line", line_no + 1);
            }
            header = Some(parse_header(line, line_no + 1)?);
            continue;
        }
        for tok in line.split_whitespace() {
            let value: i64 = tok
                .parse()
                .with_context(|| format!("line {}: bad literal '{}'", line_no + 1, tok))?;
            if value == 0 {
                cnf.add_clause(std::mem::take(&mut pending));
                continue;
            }
            let lit = lit_from_dimacs_int(value)
                .with_context(|| format!("line {}: literal {} out of range", line_no + 1, value))?;
            if let Some((num_vars, _)) = header {
                if lit.var > num_vars {
                    bail!(
                        "line {}: variable {} exceeds declared count {}",
                        line_no + 1,
                        lit.var,
                        num_vars
                    );
                }
            }
            pending.push(lit);
        }
    }

    // tolerate a missing terminator on the last clause
    if !pending.is_empty() {
        cnf.add_clause(pending);
    }
    if let Some((num_vars, _)) = header {
        cnf.num_vars = cnf.num_vars.max(num_vars);
    }
    Ok(cnf)
}

fn parse_header(line: &str, line_no: usize) -> Result<(u32, usize)> {
    let parts = line.split_whitespace().collect::<Vec<_>>();
    if parts.len() != 4 || parts[1] != "cnf" {
        bail!("line {}: expected 'p cnf <vars> <clauses>'", line_no);
    }
    let vars = parts[2]
        .parse()
        .with_context(|| format!("line {}: bad variable count", line_no))?;
    let clauses = parts[3]
        .parse()
        .with_context(|| format!("line {}: bad clause count", line_no))?;
    Ok((vars, clauses))
}

pub fn load_premises<P: AsRef<Path>>(path: P) -> Result<IndexMap<u32, bool>> {
    let path = path.as_ref();
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_premises_str(&text)
}

/// Signed integers separated by whitespace; `3` fixes var 3 true, `-3`
/// fixes it false. Later entries override earlier ones.
pub fn parse_premises_str(src: &str) -> Result<IndexMap<u32, bool>> {
    let mut premises = IndexMap::new();
    for line in src.lines() {
        let line = line.trim();
        if line.starts_with('c') {
            continue;
        }
        for tok in line.split_whitespace() {
            // accept solver-style "v" prefixed value lines
            if tok == "v" {
                continue;
            }
            let value: i64 = tok
                .parse()
                .with_context(|| format!("bad premise literal '{}'", tok))?;
            if value == 0 {
                continue;
            }
            let lit = lit_from_dimacs_int(value)
                .with_context(|| format!("premise {} out of range", value))?;
            premises.insert(lit.var, lit.sign);
        }
    }
    Ok(premises)
}

pub fn lit_from_dimacs_int(value: i64) -> Option<Lit<u32>> {
    let var = u32::try_from(value.unsigned_abs()).ok()?;
    if var == 0 {
        return None;
    }
    Some(Lit::new(var, value > 0))
}

pub fn lit_to_dimacs_int(lit: Lit<u32>) -> i64 {
    let v = lit.var as i64;
    if lit.sign { v } else { -v }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiline_clauses_and_comments() {
        let src = "\
c example
p cnf 3 2
1 -2
 0
-3 0
";
        let cnf = parse_dimacs_str(src).expect("parse");
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(
            cnf.clauses,
            vec![vec![Lit::pos(1), Lit::neg_of(2)], vec![Lit::neg_of(3)]]
        );
    }

    #[test]
    fn rejects_variable_beyond_header() {
        let err = parse_dimacs_str("p cnf 2 1\n1 5 0\n").expect_err("must fail");
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn writes_what_it_reads() {
        let src = "p cnf 3 2\n1 -2 0\n-3 0\n";
        let cnf = parse_dimacs_str(src).expect("parse");
        assert_eq!(to_dimacs(&cnf), src);
    }

    #[test]
    fn premises_accept_value_lines() {
        let premises = parse_premises_str("c fixed\nv 1 -4 0\n2\n").expect("parse");
        assert_eq!(
            premises.into_iter().collect::<Vec<_>>(),
            vec![(1, true), (4, false), (2, true)]
        );
    }
}
