//! CPLEX LP format output.

use std::io::{self, Write};

use crate::constraint::ConsSense;
use crate::model::{ObjSense, Problem};
use crate::variable::{VarId, VarType};

pub(crate) fn write_lp(prob: &Problem, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "\\* {} *\\", prob.name)?;
    match prob.sense {
        ObjSense::Minimize => writeln!(out, "Minimize")?,
        ObjSense::Maximize => writeln!(out, "Maximize")?,
    }
    let objective: Vec<(VarId, f64)> = prob
        .vars
        .iter()
        .filter(|v| v.obj != 0.0)
        .map(|v| (v.id, v.obj))
        .collect();
    writeln!(out, " obj: {}", linear_expr(prob, &objective))?;

    writeln!(out, "Subject To")?;
    for cons in &prob.conss {
        let expr = linear_expr(prob, &cons.terms);
        match cons.sense() {
            ConsSense::Le(rhs) => writeln!(out, " {}: {expr} <= {}", cons.name, num(rhs))?,
            ConsSense::Ge(lhs) => writeln!(out, " {}: {expr} >= {}", cons.name, num(lhs))?,
            ConsSense::Eq(rhs) => writeln!(out, " {}: {expr} = {}", cons.name, num(rhs))?,
            ConsSense::Range(lhs, rhs) => {
                writeln!(out, " {}: {} <= {expr} <= {}", cons.name, num(lhs), num(rhs))?
            }
            ConsSense::Free => {}
        }
    }

    let bounded: Vec<_> = prob
        .vars
        .iter()
        .filter(|v| v.var_type != VarType::Binary && !(v.lb == 0.0 && v.ub == f64::INFINITY))
        .collect();
    if !bounded.is_empty() {
        writeln!(out, "Bounds")?;
        for v in bounded {
            match (v.lb.is_finite(), v.ub.is_finite()) {
                (true, true) if v.lb == v.ub => writeln!(out, " {} = {}", v.name, num(v.lb))?,
                (true, true) => {
                    writeln!(out, " {} <= {} <= {}", num(v.lb), v.name, num(v.ub))?
                }
                (true, false) => writeln!(out, " {} >= {}", v.name, num(v.lb))?,
                (false, true) => writeln!(out, " -inf <= {} <= {}", v.name, num(v.ub))?,
                (false, false) => writeln!(out, " {} free", v.name)?,
            }
        }
    }

    write_section(out, "General", prob, VarType::Integer)?;
    write_section(out, "Binary", prob, VarType::Binary)?;
    writeln!(out, "End")
}

fn write_section(
    out: &mut dyn Write,
    title: &str,
    prob: &Problem,
    var_type: VarType,
) -> io::Result<()> {
    let names: Vec<&str> = prob
        .vars
        .iter()
        .filter(|v| v.var_type == var_type)
        .map(|v| v.name.as_str())
        .collect();
    if names.is_empty() {
        return Ok(());
    }
    writeln!(out, "{title}")?;
    for name in names {
        writeln!(out, " {name}")?;
    }
    Ok(())
}

fn linear_expr(prob: &Problem, terms: &[(VarId, f64)]) -> String {
    let mut expr = String::new();
    for (i, &(var, coef)) in terms.iter().enumerate() {
        let name = &prob.vars[var].name;
        let sign = if coef < 0.0 { "-" } else { "+" };
        let abs = coef.abs();
        if i == 0 {
            if coef < 0.0 {
                expr.push_str("- ");
            }
        } else {
            expr.push_str(&format!(" {sign} "));
        }
        if abs == 1.0 {
            expr.push_str(name);
        } else {
            expr.push_str(&format!("{} {name}", num(abs)));
        }
    }
    if expr.is_empty() {
        expr.push('0');
    }
    expr
}

fn num(val: f64) -> String {
    if val == f64::INFINITY {
        "inf".to_string()
    } else if val == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{val}")
    }
}
