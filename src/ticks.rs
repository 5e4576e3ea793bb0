//! Tick positions and labels for the chart axes.
//!
//! Plotters picks its own key points; the log axes pin them instead,
//! so they show every power of ten and the multiples in between.

const REL_TOL: f64 = 1e-9;

/// Major and minor ticks of a base 10 logarithmic axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LogTicks {
    /// powers of ten
    pub major: Vec<f64>,
    /// the eight multiples 2..9 of each power of ten
    pub minor: Vec<f64>,
}

impl LogTicks {
    /// All the ticks, ascending.
    pub fn all(&self) -> Vec<f64> {
        let mut all: Vec<f64> = self.major.iter().chain(self.minor.iter()).copied().collect();
        all.sort_by(|a, b| a.total_cmp(b));
        all
    }
}

fn in_range(v: f64, lo: f64, hi: f64) -> bool {
    v >= lo * (1. - REL_TOL) && v <= hi * (1. + REL_TOL)
}

/// Ticks for the positive, finite range lo..hi.
pub fn log_ticks(lo: f64, hi: f64) -> LogTicks {
    let mut ticks = LogTicks {
        major: Vec::new(),
        minor: Vec::new(),
    };
    if !(lo > 0. && hi >= lo && hi.is_finite()) {
        return ticks;
    }
    let first = lo.log10().floor() as i32;
    let last = hi.log10().ceil() as i32;
    for e in first..=last {
        let base = 10f64.powi(e);
        if in_range(base, lo, hi) {
            ticks.major.push(base);
        }
        for m in 2..=9 {
            let v = m as f64 * base;
            if in_range(v, lo, hi) {
                ticks.minor.push(v);
            }
        }
    }
    ticks
}

/// The smallest range of whole decades containing lo..hi.
pub fn decade_bounds(lo: f64, hi: f64) -> (f64, f64) {
    let lo_exp = (lo.log10() + REL_TOL).floor() as i32;
    let mut hi_exp = (hi.log10() - REL_TOL).ceil() as i32;
    if hi_exp <= lo_exp {
        hi_exp = lo_exp + 1;
    }
    (10f64.powi(lo_exp), 10f64.powi(hi_exp))
}

/// Integer label for values from 1 up, a short decimal below.
pub fn tick_label(v: f64) -> String {
    if v.abs() >= 1. {
        format!("{}", v.round() as i64)
    } else {
        format!("{}", (v * 1e6).round() / 1e6)
    }
}

pub fn percent_label(v: f64) -> String {
    format!("{}%", v.round() as i64)
}
