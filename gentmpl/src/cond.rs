//! `while=` conditional expressions gating Block generation (§4.2
//! "Conditional expression").

use crate::variables::Variables;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Eq,
    Lt,
    Gt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Side {
    Literal(i64),
    Var(String),
}

impl Side {
    fn parse(s: &str) -> Side {
        if let Some(name) = s.strip_prefix('$') {
            Side::Var(name.to_string())
        } else if let Ok(n) = s.parse::<i64>() {
            Side::Literal(n)
        } else {
            // Not a dollar reference and not an integer: treat the raw text
            // as a variable name lookup, the most forgiving reading.
            Side::Var(s.to_string())
        }
    }

    fn resolve(&self, vars: &Variables) -> i64 {
        match self {
            Side::Literal(n) => *n,
            Side::Var(name) => vars.get(name).parse().unwrap_or(0),
        }
    }
}

/// A compiled `while=` condition. Folded to `Const` at parse time when both
/// sides are literal (§4.2), or when the operator is ambiguous (§4.2: zero,
/// two, or three operator-character matches all fold to `Const(true)` with a
/// logged warning).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cond {
    Const(bool),
    Dynamic { lhs: Side, op: Op, rhs: Side },
}

impl Cond {
    pub fn parse(expr: &str) -> Cond {
        let ops: Vec<(usize, Op)> = expr
            .char_indices()
            .filter_map(|(i, c)| match c {
                '=' => Some((i, Op::Eq)),
                '<' => Some((i, Op::Lt)),
                '>' => Some((i, Op::Gt)),
                _ => None,
            })
            .collect();
        if ops.len() != 1 {
            log::warn!(
                "ambiguous while= expression {expr:?} ({} operator matches), treating as constant true",
                ops.len()
            );
            return Cond::Const(true);
        }
        let (pos, op) = &ops[0];
        let lhs = Side::parse(expr[..*pos].trim());
        let rhs = Side::parse(expr[pos + 1..].trim());
        let cond = Cond::Dynamic {
            lhs,
            op: op.clone(),
            rhs,
        };
        // Fold constant-vs-constant expressions at parse time (§4.2).
        if let Cond::Dynamic {
            lhs: Side::Literal(a),
            op,
            rhs: Side::Literal(b),
        } = &cond
        {
            return Cond::Const(eval_op(op, *a, *b));
        }
        cond
    }

    pub fn eval(&self, vars: &Variables) -> bool {
        match self {
            Cond::Const(b) => *b,
            Cond::Dynamic { lhs, op, rhs } => eval_op(op, lhs.resolve(vars), rhs.resolve(vars)),
        }
    }
}

fn eval_op(op: &Op, a: i64, b: i64) -> bool {
    match op {
        Op::Eq => a == b,
        Op::Lt => a < b,
        Op::Gt => a > b,
    }
}
