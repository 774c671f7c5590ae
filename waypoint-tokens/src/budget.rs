/// Token budget arithmetic shared by the context packer.
pub struct TokenBudget;

impl TokenBudget {
    /// How many tokens remain from a total budget after using `used`.
    pub fn remaining(total: usize, used: usize) -> usize {
        total.saturating_sub(used)
    }

    /// Token cost of keeping `kept` out of `total` units of a text that costs
    /// `tokens`, rounded up and never above `cap`.
    pub fn scaled(tokens: usize, kept: usize, total: usize, cap: usize) -> usize {
        if total == 0 {
            return 0;
        }
        let scaled = (tokens as u128 * kept as u128).div_ceil(total as u128);
        (scaled.min(cap as u128)) as usize
    }
}
