//! Generates the lookup tables linked into `lutra-core`.
//!
//! Every table is computed here with host floating point and written to
//! `$OUT_DIR/tables.rs`, which `math::lut` includes. The crate itself never
//! evaluates a transcendental function at run time.
//!
//! Configuration:
//!
//! * `LUTRA_SIN_TABLE_LEN`: number of entries in the sine and cosine
//!   tables, default 1024. Must be in the range 4..=65536.

use std::f64::consts::TAU;
use std::fmt::{Display, Write as _};
use std::{env, fs, path::Path};

const DEFAULT_SIN_LEN: usize = 1024;

/// Bipartite table parameters: coarse, middle, and fine index widths.
const BTM_N1: u32 = 4;
const BTM_N2: u32 = 5;
const BTM_N3: u32 = 5;

/// Number of mantissa segments in the integer-by-float chart.
const MANT_SEGMENTS: u32 = 16;

fn main() {
    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-env-changed=LUTRA_SIN_TABLE_LEN");

    let sin_len = match env::var("LUTRA_SIN_TABLE_LEN") {
        Ok(s) => s
            .trim()
            .parse::<usize>()
            .unwrap_or_else(|e| panic!("invalid LUTRA_SIN_TABLE_LEN {s:?}: {e}")),
        Err(_) => DEFAULT_SIN_LEN,
    };
    assert!(
        (4..=65536).contains(&sin_len),
        "LUTRA_SIN_TABLE_LEN must be in 4..=65536, was {sin_len}"
    );

    let mut out = String::new();
    out.push_str("// Generated by build.rs. Do not edit.\n\n");

    emit(&mut out, "VALUATION", "u8", &valuation());
    emit(&mut out, "LOG2", "u16", &log2_q8());
    emit(&mut out, "EXP2", "u16", &exp2_q8());

    writeln!(out, "/// Number of entries in [`SIN`] and [`COS`].").unwrap();
    writeln!(out, "pub const SIN_LEN: usize = {sin_len};\n").unwrap();
    let (sin, cos) = sin_cos_q15(sin_len);
    emit_len(&mut out, "SIN", "i16", "SIN_LEN", &sin);
    emit_len(&mut out, "COS", "i16", "SIN_LEN", &cos);

    emit(&mut out, "ATAN", "u16", &atan_turns());
    emit(&mut out, "ACOS", "u16", &acos_turns());
    emit(&mut out, "LSE", "u16", &log_sum_exp_q8());

    let (l1, l2) = bipartite(|x| (1.0 + x).log2());
    let (e1, e2) = bipartite(|x| x.exp2() - 1.0);
    emit(&mut out, "BTM_LOG2_T1", "u16", &l1);
    emit(&mut out, "BTM_LOG2_T2", "i16", &l2);
    emit(&mut out, "BTM_EXP2_T1", "u16", &e1);
    emit(&mut out, "BTM_EXP2_T2", "i16", &e2);

    let (c0, c1) = mantissa_chart_q16();
    emit(&mut out, "MANT_C0", "u32", &c0);
    emit(&mut out, "MANT_C1", "i32", &c1);

    emit(&mut out, "PERSPECTIVE", "u16", &perspective_q8());
    emit(&mut out, "STEREO", "u16", &stereographic_q12());

    let dest = Path::new(&env::var("OUT_DIR").expect("OUT_DIR is set by cargo"))
        .join("tables.rs");
    fs::write(&dest, out)
        .unwrap_or_else(|e| panic!("cannot write {}: {e}", dest.display()));
}

fn emit<T: Display>(out: &mut String, name: &str, ty: &str, vals: &[T]) {
    let len = vals.len().to_string();
    emit_len(out, name, ty, &len, vals);
}

fn emit_len<T: Display>(
    out: &mut String,
    name: &str,
    ty: &str,
    len: &str,
    vals: &[T],
) {
    writeln!(out, "pub static {name}: Table<{ty}, {len}> = Table::new([").unwrap();
    for chunk in vals.chunks(12) {
        out.push_str("   ");
        for v in chunk {
            write!(out, " {v},").unwrap();
        }
        out.push('\n');
    }
    out.push_str("]);\n\n");
}

fn round_to<T: TryFrom<i64>>(x: f64, lo: i64, hi: i64) -> T {
    let r = (x.round() as i64).clamp(lo, hi);
    T::try_from(r).unwrap_or_else(|_| unreachable!("value clamped to range"))
}

/// Index of the highest set bit of each byte, 0 for 0.
fn valuation() -> Vec<u8> {
    (0..256u32)
        .map(|i| if i == 0 { 0 } else { (31 - i.leading_zeros()) as u8 })
        .collect()
}

/// log2(i) in Q8.8 for i in 0..256, 0 for 0.
fn log2_q8() -> Vec<u16> {
    (0..256i32)
        .map(|i| match i {
            0 => 0,
            i => round_to(f64::from(i).log2() * 256.0, 0, 0xFFFF),
        })
        .collect()
}

/// 2^(f/256) in Q8.8 for f in 0..256.
fn exp2_q8() -> Vec<u16> {
    (0..256i32)
        .map(|f| round_to((f64::from(f) / 256.0).exp2() * 256.0, 0, 0xFFFF))
        .collect()
}

/// Sine and cosine of `i / n` turns in Q1.15.
fn sin_cos_q15(n: usize) -> (Vec<i16>, Vec<i16>) {
    (0..n)
        .map(|i| {
            let a = TAU * i as f64 / n as f64;
            let s: i16 = round_to(a.sin() * 32768.0, -32768, 32767);
            let c: i16 = round_to(a.cos() * 32768.0, -32768, 32767);
            (s, c)
        })
        .unzip()
}

const UNITS_PER_RAD: f64 = 65536.0 / TAU;

/// atan(i/255) in angle units (65536 per turn), first octant.
fn atan_turns() -> Vec<u16> {
    (0..256i32)
        .map(|i| round_to((f64::from(i) / 255.0).atan() * UNITS_PER_RAD, 0, 0xFFFF))
        .collect()
}

/// acos(i/255) in angle units, for non-negative arguments.
fn acos_turns() -> Vec<u16> {
    (0..256i32)
        .map(|i| round_to((f64::from(i) / 255.0).acos() * UNITS_PER_RAD, 0, 0xFFFF))
        .collect()
}

/// log2(1 + 2^-d) in Q8.8, where d = i/32 (a Q8.8 difference shifted by 3).
fn log_sum_exp_q8() -> Vec<u16> {
    (0..256i32)
        .map(|i| {
            let d = f64::from(i) * 8.0 / 256.0;
            round_to((1.0 + (-d).exp2()).log2() * 256.0, 0, 0xFFFF)
        })
        .collect()
}

/// Bipartite decomposition of `f` over [0, 1) in Q0.16.
///
/// T1 holds `f` at the midpoint of each (coarse, middle) cell; T2 holds a
/// signed linear correction per (coarse, fine) pair, using the secant slope
/// of the coarse segment.
fn bipartite(f: impl Fn(f64) -> f64) -> (Vec<u16>, Vec<i16>) {
    let (n1, n2, n3) = (BTM_N1, BTM_N2, BTM_N3);
    let total = f64::from(1u32 << (n1 + n2 + n3));
    let scale = 65536.0;

    let mut t1 = vec![0u16; 1 << (n1 + n2)];
    let mut t2 = vec![0i16; 1 << (n1 + n3)];

    for i1 in 0..1u32 << n1 {
        for i2 in 0..1u32 << n2 {
            let x = f64::from(((i1 << n2 | i2) << n3) + (1 << (n3 - 1))) / total;
            t1[(i1 << n2 | i2) as usize] = round_to(f(x) * scale, 0, 0xFFFF);
        }
        let seg = f64::from(1u32 << (n2 + n3)) / total;
        let start = f64::from(i1 << (n2 + n3)) / total;
        let slope = (f(start + seg) - f(start)) / seg;

        for i3 in 0..1u32 << n3 {
            let offset = f64::from(i3) - f64::from(1u32 << (n3 - 1));
            let corr = slope * offset / total;
            t2[(i1 << n3 | i3) as usize] = round_to(corr * scale, -32768, 32767);
        }
    }
    (t1, t2)
}

/// Linear chart `c0 + c1·δ` of the mantissa 1 + i/n + δ/n over each of
/// the n segments of [1, 2), δ in [0, 1), both coefficients in Q16.16.
///
/// The coefficients are a least-squares fit of the mantissa over the
/// segment, which for the identity is its start and width.
fn mantissa_chart_q16() -> (Vec<u32>, Vec<i32>) {
    let n = f64::from(MANT_SEGMENTS);
    let samples = 4096;
    (0..MANT_SEGMENTS)
        .map(|i| {
            let lo = 1.0 + f64::from(i) / n;
            let hi = lo + 1.0 / n;
            let (mut sx, mut sxx, mut sy, mut sxy) = (0.0, 0.0, 0.0, 0.0);
            for j in 0..samples {
                let x = (f64::from(j) + 0.5) / f64::from(samples);
                let y = lo + (hi - lo) * x;
                sx += x;
                sxx += x * x;
                sy += y;
                sxy += x * y;
            }
            let k = f64::from(samples);
            let slope = (k * sxy - sx * sy) / (k * sxx - sx * sx);
            let icpt = (sy - slope * sx) / k;
            let (min, max) = (i32::MIN.into(), i32::MAX.into());
            let c0: u32 = round_to(icpt * 65536.0, 0, u32::MAX.into());
            let c1: i32 = round_to(slope * 65536.0, min, max);
            (c0, c1)
        })
        .unzip()
}

/// focal / (focal + z) in Q8, z spanning 0..=1024 with focal 256.
fn perspective_q8() -> Vec<u16> {
    let (focal, z_max) = (256.0, 1024.0);
    (0..256i32)
        .map(|i| {
            let z = z_max * f64::from(i) / 255.0;
            round_to(focal / (focal + z) * 256.0, 0, 0xFFFF)
        })
        .collect()
}

/// Stereographic radial factor 2 / (1 + r²) in Q12, r spanning 0..=2.
fn stereographic_q12() -> Vec<u16> {
    (0..256i32)
        .map(|i| {
            let r = 2.0 * f64::from(i) / 255.0;
            round_to(2.0 / (1.0 + r * r) * 4096.0, 0, 0xFFFF)
        })
        .collect()
}
