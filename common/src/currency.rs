/// Paise per rupee. All amounts are stored in paise.
pub const PAISE_PER_RUPEE: u64 = 100;

/// Format an amount in paise as rupees, e.g. `4750` → `"₹47.50"`.
pub fn format_rupees(amount_paise: u64) -> String {
    format!(
        "₹{}.{:02}",
        amount_paise / PAISE_PER_RUPEE,
        amount_paise % PAISE_PER_RUPEE
    )
}

/// Whole rupees to paise.
pub fn rupees(amount: u64) -> u64 {
    amount * PAISE_PER_RUPEE
}
