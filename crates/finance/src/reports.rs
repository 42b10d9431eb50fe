//! Read-only aggregates over a [`Book`].
//!
//! These feed the dashboard and reports views: totals, month-scoped
//! income/expense, category breakdowns, the recent-months series and
//! budget/goal progress. Entries without a parseable date stay in the
//! ledger (and in balances) but never match a date-scoped aggregate.

use chrono::{Days, NaiveDate};
use model::{Budget, BudgetPeriod, Money, MonthKey, Polarity, Transaction};
use uuid::Uuid;

use crate::Book;

/// Income and expense totals for one month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub income: Money,
    pub expense: Money,
}

/// Spending total for one category inside a month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub name: String,
    pub color: String,
    pub total: Money,
}

/// Income and expense totals for an inclusive date range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RangeTotals {
    pub income: Money,
    pub expense: Money,
}

/// Ledger-derived progress of one budget.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetProgress {
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub limit: Money,
    pub spent: Money,
    /// `spent / limit`; 0 for a zero limit.
    pub ratio: f64,
    pub alert: bool,
}

impl Book {
    /// Sum of every account's derived balance.
    #[must_use]
    pub fn total_balance(&self) -> Money {
        self.accounts.iter().map(|a| a.balance).sum()
    }

    fn month_total(&self, polarity: Polarity, month: MonthKey) -> Money {
        self.ledger
            .iter()
            .filter(|tx| tx.polarity == polarity)
            .filter(|tx| tx.date.is_some_and(|date| month.contains(date)))
            .map(|tx| tx.amount)
            .sum()
    }

    #[must_use]
    pub fn monthly_income(&self, month: MonthKey) -> Money {
        self.month_total(Polarity::Income, month)
    }

    #[must_use]
    pub fn monthly_expense(&self, month: MonthKey) -> Money {
        self.month_total(Polarity::Expense, month)
    }

    /// Income/expense totals for the `months` most recent months ending
    /// at `end`, oldest first.
    #[must_use]
    pub fn monthly_series(&self, end: MonthKey, months: usize) -> Vec<MonthlySummary> {
        let mut keys = Vec::with_capacity(months);
        let mut month = end;
        for _ in 0..months {
            keys.push(month);
            month = month.pred();
        }
        keys.reverse();

        keys.into_iter()
            .map(|month| MonthlySummary {
                month,
                income: self.monthly_income(month),
                expense: self.monthly_expense(month),
            })
            .collect()
    }

    /// Per-category expense totals for one month. Categories with no
    /// spending are omitted.
    #[must_use]
    pub fn expenses_by_category(&self, month: MonthKey) -> Vec<CategoryTotal> {
        self.categories
            .iter()
            .filter(|category| category.polarity == Polarity::Expense)
            .map(|category| CategoryTotal {
                category_id: category.id,
                name: category.name.clone(),
                color: category.color.clone(),
                total: self
                    .ledger
                    .iter()
                    .filter(|tx| tx.polarity == Polarity::Expense)
                    .filter(|tx| tx.category_id == Some(category.id))
                    .filter(|tx| tx.date.is_some_and(|date| month.contains(date)))
                    .map(|tx| tx.amount)
                    .sum(),
            })
            .filter(|total| !total.total.is_zero())
            .collect()
    }

    /// Income/expense totals over an inclusive date range.
    #[must_use]
    pub fn range_totals(&self, start: NaiveDate, end: NaiveDate) -> RangeTotals {
        let mut totals = RangeTotals::default();
        for tx in &self.ledger {
            let Some(date) = tx.date else { continue };
            if date < start || date > end {
                continue;
            }
            match tx.polarity {
                Polarity::Income => totals.income += tx.amount,
                Polarity::Expense => totals.expense += tx.amount,
            }
        }
        totals
    }

    /// The `limit` most recent entries, newest date first; entries
    /// without a date sort last.
    #[must_use]
    pub fn recent_entries(&self, limit: usize) -> Vec<Transaction> {
        let mut entries = self.ledger.clone();
        entries.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        entries.truncate(limit);
        entries
    }

    /// Expense total for one category over a budgeting window ending at
    /// `today`: the calendar month of `today`, or its trailing seven
    /// days.
    #[must_use]
    pub fn category_spending(
        &self,
        category_id: Uuid,
        period: BudgetPeriod,
        today: NaiveDate,
    ) -> Money {
        let in_window = |date: NaiveDate| match period {
            BudgetPeriod::Monthly => MonthKey::from_date(today).contains(date),
            BudgetPeriod::Weekly => {
                let start = today.checked_sub_days(Days::new(6)).unwrap_or(today);
                date >= start && date <= today
            }
        };
        self.ledger
            .iter()
            .filter(|tx| tx.polarity == Polarity::Expense)
            .filter(|tx| tx.category_id == Some(category_id))
            .filter(|tx| tx.date.is_some_and(in_window))
            .map(|tx| tx.amount)
            .sum()
    }

    /// Progress of every budget, with `spent` derived from the ledger.
    /// The stored spent hint is ignored here on purpose.
    #[must_use]
    pub fn budget_progress(&self, today: NaiveDate) -> Vec<BudgetProgress> {
        self.budgets
            .iter()
            .map(|budget| self.progress_of(budget, today))
            .collect()
    }

    fn progress_of(&self, budget: &Budget, today: NaiveDate) -> BudgetProgress {
        let spent = self.category_spending(budget.category_id, budget.period, today);
        let ratio = spent.ratio_of(budget.amount).unwrap_or(0.0);
        BudgetProgress {
            budget_id: budget.id,
            category_id: budget.category_id,
            limit: budget.amount,
            spent,
            ratio,
            alert: ratio >= budget.alert_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use model::{Account, AccountKind, Category};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dated_entry(polarity: Polarity, cents: i64, date: NaiveDate, account: Uuid) -> Transaction {
        let mut tx = Transaction::new(polarity, Money::new(cents), "entry", account);
        tx.date = Some(date);
        tx
    }

    fn march() -> MonthKey {
        MonthKey::new(2024, 3).unwrap()
    }

    #[test]
    fn total_balance_sums_every_account() {
        // Two seeded-at-zero accounts: +200.00 into one, -40.00 out of
        // the other.
        let checking = Account::new("Checking", AccountKind::Bank, Money::ZERO, "#111");
        let wallet = Account::new("Wallet", AccountKind::Wallet, Money::ZERO, "#222");
        let mut book = Book {
            ledger: vec![
                dated_entry(Polarity::Income, 20_000, date(2024, 3, 1), checking.id),
                dated_entry(Polarity::Expense, 4000, date(2024, 3, 2), wallet.id),
            ],
            accounts: vec![checking, wallet],
            ..Book::default()
        };
        book.rebuild_balances();

        assert_eq!(book.total_balance(), Money::new(16_000));
        let summed: Money = book.accounts.iter().map(|a| a.balance).sum();
        assert_eq!(book.total_balance(), summed);
    }

    #[test]
    fn monthly_totals_are_prefix_scoped() {
        let account = Uuid::new_v4();
        let book = Book {
            ledger: vec![
                dated_entry(Polarity::Income, 10_000, date(2024, 3, 5), account),
                dated_entry(Polarity::Income, 10_000, date(2024, 2, 28), account),
                dated_entry(Polarity::Expense, 2500, date(2024, 3, 9), account),
            ],
            ..Book::default()
        };

        assert_eq!(book.monthly_income(march()), Money::new(10_000));
        assert_eq!(book.monthly_expense(march()), Money::new(2500));
        assert_eq!(
            book.monthly_income(MonthKey::new(2024, 2).unwrap()),
            Money::new(10_000)
        );
    }

    #[test]
    fn dateless_entries_count_for_balances_but_not_months() {
        let checking = Account::new("Checking", AccountKind::Bank, Money::ZERO, "#111");
        let id = checking.id;
        let dateless = Transaction::new(Polarity::Income, Money::new(500), "sem data", id);
        let mut book = Book {
            accounts: vec![checking],
            ledger: vec![dateless],
            ..Book::default()
        };
        book.rebuild_balances();

        assert_eq!(book.account(id).unwrap().balance, Money::new(500));
        assert_eq!(book.monthly_income(march()), Money::ZERO);
    }

    #[test]
    fn series_covers_recent_months_oldest_first() {
        let account = Uuid::new_v4();
        let book = Book {
            ledger: vec![
                dated_entry(Polarity::Income, 100, date(2024, 1, 15), account),
                dated_entry(Polarity::Expense, 50, date(2024, 3, 15), account),
            ],
            ..Book::default()
        };

        let series = book.monthly_series(march(), 6);
        assert_eq!(series.len(), 6);
        assert_eq!(series[0].month.to_string(), "2023-10");
        assert_eq!(series[5].month, march());
        assert_eq!(series[3].income, Money::new(100));
        assert_eq!(series[5].expense, Money::new(50));
    }

    #[test]
    fn category_breakdown_omits_untouched_categories() {
        let food = Category::new("Alimentação", Polarity::Expense, "🍽️", "#EF4444");
        let fun = Category::new("Lazer", Polarity::Expense, "🎮", "#EC4899");
        let salary = Category::new("Salário", Polarity::Income, "💰", "#059669");
        let account = Uuid::new_v4();

        let mut lunch = dated_entry(Polarity::Expense, 2500, date(2024, 3, 3), account);
        lunch.category_id = Some(food.id);
        let mut pay = dated_entry(Polarity::Income, 300_000, date(2024, 3, 1), account);
        pay.category_id = Some(salary.id);

        let food_id = food.id;
        let book = Book {
            categories: vec![food, fun, salary],
            ledger: vec![lunch, pay],
            ..Book::default()
        };

        let breakdown = book.expenses_by_category(march());
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].category_id, food_id);
        assert_eq!(breakdown[0].total, Money::new(2500));
    }

    #[test]
    fn range_totals_use_inclusive_bounds() {
        let account = Uuid::new_v4();
        let book = Book {
            ledger: vec![
                dated_entry(Polarity::Income, 100, date(2024, 3, 1), account),
                dated_entry(Polarity::Expense, 40, date(2024, 3, 10), account),
                dated_entry(Polarity::Income, 999, date(2024, 3, 11), account),
            ],
            ..Book::default()
        };

        let totals = book.range_totals(date(2024, 3, 1), date(2024, 3, 10));
        assert_eq!(totals.income, Money::new(100));
        assert_eq!(totals.expense, Money::new(40));
    }

    #[test]
    fn recent_entries_sort_newest_first_dateless_last() {
        let account = Uuid::new_v4();
        let old = dated_entry(Polarity::Income, 1, date(2024, 1, 1), account);
        let newer = dated_entry(Polarity::Income, 2, date(2024, 3, 1), account);
        let dateless = Transaction::new(Polarity::Income, Money::new(3), "x", account);
        let book = Book {
            ledger: vec![old.clone(), dateless.clone(), newer.clone()],
            ..Book::default()
        };

        let recent = book.recent_entries(10);
        assert_eq!(recent[0].id, newer.id);
        assert_eq!(recent[1].id, old.id);
        assert_eq!(recent[2].id, dateless.id);
        assert_eq!(book.recent_entries(1).len(), 1);
    }

    #[test]
    fn budget_progress_derives_spend_from_the_ledger() {
        let food = Category::new("Alimentação", Polarity::Expense, "🍽️", "#EF4444");
        let account = Uuid::new_v4();
        let mut budget = Budget::new(food.id, Money::new(10_000), BudgetPeriod::Monthly);
        budget.spent_hint = Money::new(99_999); // stale stored value

        let mut groceries = dated_entry(Polarity::Expense, 8500, date(2024, 3, 12), account);
        groceries.category_id = Some(food.id);
        let mut last_month = dated_entry(Polarity::Expense, 700, date(2024, 2, 12), account);
        last_month.category_id = Some(food.id);

        let book = Book {
            categories: vec![food],
            budgets: vec![budget],
            ledger: vec![groceries, last_month],
            ..Book::default()
        };

        let progress = book.budget_progress(date(2024, 3, 20));
        let progress = &progress[0];
        assert_eq!(progress.spent, Money::new(8500));
        assert_eq!(progress.ratio, 0.85);
        assert!(progress.alert);
    }

    #[test]
    fn weekly_spending_window_trails_seven_days() {
        let food = Category::new("Alimentação", Polarity::Expense, "🍽️", "#EF4444");
        let account = Uuid::new_v4();

        let mut inside = dated_entry(Polarity::Expense, 100, date(2024, 3, 14), account);
        inside.category_id = Some(food.id);
        let mut edge = dated_entry(Polarity::Expense, 10, date(2024, 3, 8), account);
        edge.category_id = Some(food.id);
        let mut outside = dated_entry(Polarity::Expense, 1, date(2024, 3, 7), account);
        outside.category_id = Some(food.id);

        let food_id = food.id;
        let book = Book {
            categories: vec![food],
            ledger: vec![inside, edge, outside],
            ..Book::default()
        };

        let spent = book.category_spending(food_id, BudgetPeriod::Weekly, date(2024, 3, 14));
        assert_eq!(spent, Money::new(110));
    }
}
