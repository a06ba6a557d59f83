use harbor_core::{
    FilingStatus, TaxInputs, TaxRuleSet, calculate_taxes, compute_safe_harbor, quarterly_schedule,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Dollar amounts up to $10M with cents.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn filing_status() -> impl Strategy<Value = FilingStatus> {
    prop_oneof![Just(FilingStatus::Single), Just(FilingStatus::MarriedJoint)]
}

fn inputs() -> impl Strategy<Value = TaxInputs> {
    (filing_status(), amount(), amount(), amount()).prop_map(|(status, tax, agi, profit)| {
        TaxInputs::new(status, tax, agi, profit)
    })
}

proptest! {
    #[test]
    fn brackets_cover_taxable_income_exactly(inputs in inputs()) {
        let result = calculate_taxes(&inputs, &TaxRuleSet::tax_year_2026());
        let income = &result.income_tax;

        let covered: Decimal = income.bracket_details.iter().map(|d| d.taxable_at_rate).sum();
        let tax: Decimal = income.bracket_details.iter().map(|d| d.tax_at_rate).sum();

        prop_assert_eq!(covered, income.taxable_income);
        prop_assert_eq!(tax, income.federal_income_tax);
        prop_assert!(income.bracket_details.iter().all(|d| d.taxable_at_rate > Decimal::ZERO));
        prop_assert!(income.bracket_details.windows(2).all(|w| w[0].rate < w[1].rate));
    }

    #[test]
    fn taxes_never_decrease_with_profit(
        status in filing_status(),
        a in amount(),
        b in amount(),
    ) {
        let rules = TaxRuleSet::tax_year_2026();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        let low_tax = calculate_taxes(&TaxInputs::new(status, dec!(0), dec!(0), low), &rules);
        let high_tax = calculate_taxes(&TaxInputs::new(status, dec!(0), dec!(0), high), &rules);

        prop_assert!(
            low_tax.income_tax.federal_income_tax <= high_tax.income_tax.federal_income_tax
        );
        prop_assert!(low_tax.current_year_total_tax <= high_tax.current_year_total_tax);
    }

    #[test]
    fn social_security_tax_is_capped(inputs in inputs()) {
        let rules = TaxRuleSet::tax_year_2026();
        let result = calculate_taxes(&inputs, &rules);

        prop_assert!(
            result.self_employment_tax.social_security_tax <= rules.ss_wage_base * rules.ss_tax_rate
        );
    }

    #[test]
    fn required_payment_is_lesser_of_two_methods(inputs in inputs()) {
        let rules = TaxRuleSet::tax_year_2026();
        let result = calculate_taxes(&inputs, &rules);

        prop_assert_eq!(
            result.required_annual_payment,
            result.current_year_avoidance_minimum.min(result.safe_harbor_minimum)
        );
        prop_assert_eq!(
            result.is_current_year_lower,
            result.current_year_avoidance_minimum < result.safe_harbor_minimum
        );
        prop_assert_eq!(
            result.savings,
            (result.safe_harbor_minimum - result.current_year_avoidance_minimum).abs()
        );
    }

    #[test]
    fn quarterly_installments_add_up_to_annual(inputs in inputs()) {
        let rules = TaxRuleSet::tax_year_2026();
        let result = calculate_taxes(&inputs, &rules);

        prop_assert_eq!(result.quarterly_payment * dec!(4), result.required_annual_payment);

        let schedule = quarterly_schedule(&result, &rules);
        let total: Decimal = schedule.iter().map(|q| q.amount).sum();
        prop_assert_eq!(total, result.required_annual_payment);
    }

    #[test]
    fn safe_harbor_multiplier_follows_agi_threshold(tax in amount(), agi in amount()) {
        let rules = TaxRuleSet::tax_year_2026();
        let harbor = compute_safe_harbor(tax, agi, &rules);

        let expected = if agi > dec!(150000) { dec!(1.1) } else { dec!(1) };
        prop_assert_eq!(harbor.multiplier, expected);
        prop_assert_eq!(harbor.safe_harbor_minimum, tax * expected);
    }
}

#[test]
fn safe_harbor_threshold_boundary() {
    let rules = TaxRuleSet::tax_year_2026();

    assert_eq!(compute_safe_harbor(dec!(25000), dec!(150000), &rules).multiplier, dec!(1));
    assert_eq!(compute_safe_harbor(dec!(25000), dec!(150001), &rules).multiplier, dec!(1.1));
}
