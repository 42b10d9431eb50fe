use chrono::Local;
use finance::Finance;
use model::{MonthKey, Session};
use store::RestStore;
use uuid::Uuid;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "webcash={level},finance={level},store={level}",
            level = config.log
        ))
        .init();

    let user_id: Uuid = config
        .user_id
        .parse()
        .map_err(|_| "user_id must be a UUID (set WEBCASH_USER_ID or --user-id)")?;

    let store = RestStore::new(&config.base_url, config.api_key.clone())?;
    let mut session = Session::new(user_id, config.email.clone(), config.access_token.clone());
    if let Some(name) = config.display_name.clone() {
        session = session.display_name(name);
    }

    let finance = Finance::new(store);
    tracing::info!(user = %session.email, "loading finance data");
    finance.set_session(Some(session)).await;

    if let Some(error) = finance.load_error().await {
        tracing::error!(%error, "load failed");
        return Err(error.into());
    }

    let book = finance.book().await;
    let today = Local::now().date_naive();
    let month = MonthKey::from_date(today);

    println!("Accounts");
    for account in &book.accounts {
        println!("  {} ({}): {}", account.name, account.kind, account.balance);
    }
    println!("Total balance: {}", book.total_balance());
    println!(
        "{month}: income {} / expense {}",
        book.monthly_income(month),
        book.monthly_expense(month)
    );

    let progress = book.budget_progress(today);
    if !progress.is_empty() {
        println!("Budgets");
        for budget in &progress {
            let name = book
                .categories
                .iter()
                .find(|c| c.id == budget.category_id)
                .map_or("?", |c| c.name.as_str());
            let alert = if budget.alert { "  [alert]" } else { "" };
            println!("  {name}: {} of {}{alert}", budget.spent, budget.limit);
        }
    }

    if !book.goals.is_empty() {
        println!("Goals");
        for goal in &book.goals {
            let done = if goal.is_completed() { "  [done]" } else { "" };
            println!("  {}: {} of {}{done}", goal.name, goal.saved, goal.target);
        }
    }

    Ok(())
}
