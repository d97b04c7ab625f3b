//! Analytic expected value
//!
//! Every cell is an independent draw and every payline touches exactly one
//! cell per reel, so each line has the same payout distribution. For a
//! non-wild first symbol `s` with probability `p_s`, each further reel
//! extends the run with probability `q = p_s + p_wild`:
//!
//! ```text
//! P(run = k) = q^(k-1) · (1 - q)    for k < reels
//! P(run = k) = q^(k-1)              for k = reels
//! EV(line)   = Σ_s p_s · v_s · Σ_{k≥3} (k - 2) · P(run = k)
//! RTP        = lines · EV(line)      (per unit bet)
//! ```

use crate::paytable::MIN_RUN;
use crate::spin::SlotGame;

/// Expected payout of one payline per unit bet
pub fn line_expected_value(game: &SlotGame) -> f64 {
    let config = game.config();
    let reels = config.grid.reels as usize;
    if reels < MIN_RUN {
        return 0.0;
    }

    let total: f64 = config.symbol_weights.values().map(|&w| w as f64).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let paytable = game.paytable();
    let wild_p = config
        .symbol_weights
        .get(&config.wild)
        .map(|&w| w as f64 / total)
        .unwrap_or(0.0);

    let mut ev = 0.0;
    for (name, &weight) in &config.symbol_weights {
        if *name == config.wild {
            continue;
        }
        let value = game
            .symbols()
            .id(name)
            .map(|id| paytable.value(id))
            .unwrap_or(0.0);
        if value <= 0.0 {
            continue;
        }

        let p = weight as f64 / total;
        let q = p + wild_p;
        let mut scale = 0.0;
        for k in MIN_RUN..=reels {
            let reach = q.powi(k as i32 - 1);
            let exact = if k < reels { reach * (1.0 - q) } else { reach };
            scale += (k - 2) as f64 * exact;
        }
        ev += p * value * scale;
    }

    ev
}

/// Expected total payout per unit bet across all paylines
pub fn theoretical_rtp(game: &SlotGame) -> f64 {
    game.paytable().line_count() as f64 * line_expected_value(game)
}
