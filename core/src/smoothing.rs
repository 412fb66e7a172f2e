use std::collections::VecDeque;
use std::sync::Arc;

use crate::config::{GaitConfig, SmoothingConfig};
use crate::types::CHANNEL_COUNT;

/// Klemmer én rå avlesning.
/// Under `noise_floor` → 0 (flytende pinne). Over `sanity_ceiling` → 0 (spurious
/// outlier, regnes som "ingen last"). Ikke-endelige verdier → 0.
#[inline]
pub fn condition(raw: f64, noise_floor: f64, sanity_ceiling: f64) -> f64 {
    if !raw.is_finite() || raw < noise_floor || raw > sanity_ceiling {
        0.0
    } else {
        raw
    }
}

/// Støygulv/tak for alle kanaler. Tilstandsløs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalConditioner {
    pub noise_floor: f64,
    pub sanity_ceiling: f64,
}

impl SignalConditioner {
    pub fn from_config(cfg: &GaitConfig) -> Self {
        Self { noise_floor: cfg.noise_floor, sanity_ceiling: cfg.sanity_ceiling }
    }

    #[inline]
    pub fn condition(&self, raw: f64) -> f64 {
        condition(raw, self.noise_floor, self.sanity_ceiling)
    }

    /// Returnerer kondisjonert ramme + antall verdier forkastet over taket.
    pub fn condition_frame(&self, raw: &[f64; CHANNEL_COUNT]) -> ([f64; CHANNEL_COUNT], usize) {
        let mut out = [0.0; CHANNEL_COUNT];
        let mut outliers = 0;
        for (o, r) in out.iter_mut().zip(raw.iter()) {
            if r.is_finite() && *r > self.sanity_ceiling {
                outliers += 1;
            }
            *o = self.condition(*r);
        }
        (out, outliers)
    }
}

/// Løser A x = b med delvis pivotering. `None` hvis singulær.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let f = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= f * a[col][k];
            }
            b[row] -= f * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut s = b[row];
        for k in row + 1..n {
            s -= a[row][k] * x[k];
        }
        x[row] = s / a[row][row];
    }
    Some(x)
}

/// Savitzky–Golay-koeffisienter for et vindu på `2*half+1` punkter.
/// `coeffs[t + half]` evaluerer polynomet i posisjon `t` (relativt til midten),
/// slik at kantene kan bruke tilpasningen av første/siste fulle vindu.
#[derive(Debug, Clone, PartialEq)]
pub struct SavitzkyGolay {
    half: usize,
    coeffs: Vec<Vec<f64>>,
}

impl SavitzkyGolay {
    pub fn new(window_len: usize, poly_order: usize) -> Self {
        let half = window_len / 2;
        let w = 2 * half + 1;
        let order = poly_order.min(w - 1);
        let m = order + 1;
        let pos: Vec<f64> = (0..w).map(|j| j as f64 - half as f64).collect();

        // Normallikninger (AᵀA), A[j][p] = pos_j^p
        let mut ata = vec![vec![0.0; m]; m];
        for (p, row) in ata.iter_mut().enumerate() {
            for (q, cell) in row.iter_mut().enumerate() {
                *cell = pos.iter().map(|x| x.powi((p + q) as i32)).sum();
            }
        }

        let coeffs = pos
            .iter()
            .enumerate()
            .map(|(slot, &t)| {
                let e: Vec<f64> = (0..m).map(|p| t.powi(p as i32)).collect();
                match solve(ata.clone(), e) {
                    Some(z) => pos
                        .iter()
                        .map(|x| (0..m).map(|p| z[p] * x.powi(p as i32)).sum())
                        .collect(),
                    // ren gjennomslipp
                    None => (0..w).map(|j| if j == slot { 1.0 } else { 0.0 }).collect(),
                }
            })
            .collect();

        Self { half, coeffs }
    }

    pub fn from_config(s: &SmoothingConfig, sampling_rate_hz: f64) -> Self {
        Self::new(s.window_len(sampling_rate_hz), s.poly_order)
    }

    #[inline]
    pub fn half_window(&self) -> usize {
        self.half
    }

    #[inline]
    pub fn window_len(&self) -> usize {
        2 * self.half + 1
    }

    /// Verdien i posisjon `t` (-half..=half) for et fullt vindu.
    fn eval(&self, window: impl Iterator<Item = f64>, t: isize) -> f64 {
        let c = &self.coeffs[(t + self.half as isize) as usize];
        c.iter().zip(window).map(|(a, x)| a * x).sum()
    }
}

/// Glatter en hel serie (offline). Kanter bruker tilpasningen av første/siste vindu.
/// Serier kortere enn vinduet returneres uendret.
pub fn smooth_series(values: &[f64], sg: &SavitzkyGolay) -> Vec<f64> {
    let w = sg.window_len();
    let n = values.len();
    if n < w || w < 3 {
        return values.to_vec();
    }
    let h = sg.half as isize;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let (start, t) = if i < sg.half {
            (0, i as isize - h)
        } else if i + sg.half >= n {
            (n - w, (i - (n - w)) as isize - h)
        } else {
            (i - sg.half, 0)
        };
        out.push(sg.eval(values[start..start + w].iter().copied(), t).max(0.0));
    }
    out
}

/// Strømmende glatting for én kanal med begrenset forsinkelse (`half_window` samples).
/// Allerede utsendte verdier endres aldri.
#[derive(Debug, Clone)]
pub struct StreamingSmoother {
    sg: Arc<SavitzkyGolay>,
    buf: VecDeque<f64>,
    seen: usize,
}

impl StreamingSmoother {
    pub fn new(sg: Arc<SavitzkyGolay>) -> Self {
        let cap = sg.window_len();
        Self { sg, buf: VecDeque::with_capacity(cap), seen: 0 }
    }

    /// Legger til en verdi og returnerer de verdiene som nå er ferdig glattet.
    pub fn push(&mut self, x: f64) -> Vec<f64> {
        let w = self.sg.window_len();
        self.buf.push_back(x);
        if self.buf.len() > w {
            self.buf.pop_front();
        }
        self.seen += 1;

        if self.seen < w {
            return Vec::new();
        }
        let h = self.sg.half as isize;
        if self.seen == w {
            // første fulle vindu: send ut starten + midtpunktet
            return (-h..=0)
                .map(|t| self.sg.eval(self.buf.iter().copied(), t).max(0.0))
                .collect();
        }
        vec![self.sg.eval(self.buf.iter().copied(), 0).max(0.0)]
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.seen = 0;
    }
}

/// Glatting av hele rammer (alle kanaler i takt). Uten glatting sendes rammen rett ut.
#[derive(Debug, Clone)]
pub struct FrameSmoother {
    channels: Option<Vec<StreamingSmoother>>,
}

impl FrameSmoother {
    pub fn from_config(cfg: &GaitConfig) -> Self {
        let channels = cfg.smoothing.as_ref().map(|s| {
            let sg = Arc::new(SavitzkyGolay::from_config(s, cfg.sampling_rate_hz));
            (0..CHANNEL_COUNT).map(|_| StreamingSmoother::new(sg.clone())).collect()
        });
        Self { channels }
    }

    /// Forsinkelse i samples mellom innlest og utsendt ramme.
    pub fn delay(&self) -> usize {
        self.channels
            .as_ref()
            .and_then(|c| c.first())
            .map(|s| s.sg.half_window())
            .unwrap_or(0)
    }

    pub fn push(&mut self, frame: [f64; CHANNEL_COUNT]) -> Vec<[f64; CHANNEL_COUNT]> {
        let Some(channels) = self.channels.as_mut() else {
            return vec![frame];
        };
        let per_channel: Vec<Vec<f64>> = channels
            .iter_mut()
            .zip(frame.iter())
            .map(|(s, x)| s.push(*x))
            .collect();
        let ready = per_channel.first().map(|v| v.len()).unwrap_or(0);
        (0..ready)
            .map(|k| {
                let mut out = [0.0; CHANNEL_COUNT];
                for (c, vals) in per_channel.iter().enumerate() {
                    out[c] = vals[k];
                }
                out
            })
            .collect()
    }

    pub fn reset(&mut self) {
        if let Some(channels) = self.channels.as_mut() {
            channels.iter_mut().for_each(StreamingSmoother::reset);
        }
    }
}
