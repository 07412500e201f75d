use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, OrOverflow, Rate};
use crate::SimulatorResult;

/// Bracket searched by the IRR bisection, as rates (0.0 to 2.0 = 0% to 200%).
pub const IRR_BRACKET: (Rate, Rate) = (dec!(0), dec!(2));

/// Number of bisection halvings. 2^-50 of the bracket is below the rounding
/// applied to reported IRRs.
pub const IRR_ITERATIONS: u32 = 50;

/// Discount each end-of-period flow back to t = 0.
///
/// `flows[0]` is received at the end of period 1. A discount factor that
/// outgrows the decimal range makes the remaining flows worth zero, and so
/// does a zero factor (rate of exactly -100%) or a quotient out of range.
pub fn discounted_flows(rate: Rate, flows: &[Money]) -> Vec<Money> {
    let Some(one_plus_r) = Decimal::ONE.checked_add(rate) else {
        return vec![Decimal::ZERO; flows.len()];
    };
    let mut discount = Decimal::ONE;
    let mut saturated = false;

    flows
        .iter()
        .map(|cf| {
            if !saturated {
                match discount.checked_mul(one_plus_r) {
                    Some(next) => discount = next,
                    None => saturated = true,
                }
            }
            if saturated || discount.is_zero() {
                Decimal::ZERO
            } else {
                cf.checked_div(discount).unwrap_or(Decimal::ZERO)
            }
        })
        .collect()
}

/// Net present value of an up-front outlay followed by end-of-period flows.
pub fn npv_after_outlay(rate: Rate, outlay: Money, flows: &[Money]) -> SimulatorResult<Money> {
    discounted_flows(rate, flows)
        .into_iter()
        .try_fold(-outlay, |acc, pv| acc.checked_add(pv).or_overflow("net present value"))
}

/// Internal rate of return by bisection over a fixed bracket.
///
/// NPV is assumed to fall as the rate rises: the midpoint becomes the new
/// lower bound while NPV(mid) >= 0. There is no root-existence check; when
/// the flows never cross zero inside the bracket the estimate converges on
/// one of its edges.
pub fn irr_bisection(
    outlay: Money,
    flows: &[Money],
    bracket: (Rate, Rate),
    iterations: u32,
) -> SimulatorResult<Rate> {
    let (mut low, mut high) = bracket;
    for _ in 0..iterations {
        let mid = (low + high) / dec!(2);
        if npv_after_outlay(mid, outlay, flows)? >= Decimal::ZERO {
            low = mid;
        } else {
            high = mid;
        }
    }
    Ok((low + high) / dec!(2))
}

/// Index of the first period whose running total reaches `target`.
///
/// The running total saturates at the decimal bounds.
pub fn first_period_reaching(flows: &[Money], target: Money) -> Option<usize> {
    let mut cumulative = Decimal::ZERO;
    for (t, cf) in flows.iter().enumerate() {
        cumulative = cumulative.saturating_add(*cf);
        if cumulative >= target {
            return Some(t);
        }
    }
    None
}
