use bankable_core::{
    accounts,
    goals::GoalService,
    health::{calculate_health, FinancialProfile},
    pet::VirtualPet,
    storage::{InMemoryStore, KeyValueStore},
    widgets::WidgetService,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("Bankable core demo starting");

    let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());

    // Accounts
    println!("\n=== ACCOUNTS ===");
    for account in accounts::sample_accounts() {
        println!("  {}", account);
    }
    println!("  Total balance: £{:.2}", accounts::total_balance());
    println!("  Affirmation of the day: {}", accounts::daily_affirmation());

    // Group saving goals
    let goals = GoalService::load(store.clone()).await?;
    let goal = goals.create("Weekend Trip", 300.0, "You").await?;
    info!(goal_id = %goal.goal_id, "Created goal");

    goals.contribute(goal.goal_id, 120.0).await?;
    goals.add_member(goal.goal_id, "Alex").await?;
    let goal = goals.get(goal.goal_id).await?;

    println!("\n=== GROUP SAVING GOALS ===");
    for g in goals.list().await {
        println!(
            "  {} £{:.2}/£{:.2} ({:.0}%) with {}",
            g.name,
            g.current,
            g.target,
            g.progress_percent(),
            g.members.join(", ")
        );
    }
    goals.delete(goal.goal_id).await?;

    // Widgets
    let widgets = WidgetService::load(store).await?;
    widgets.add("group-goals").await?;
    widgets.move_widget(3, 0).await?;

    println!("\n=== HOME SCREEN LAYOUT ===");
    for widget in widgets.list().await {
        println!("  {}. {}", widget.order + 1, widget.title);
    }

    // Virtual pet
    let mut pet = VirtualPet::new();
    pet.tick(60.0);
    pet.feed();
    pet.play();
    let earned = pet.record_saving(25.0)?;

    println!("\n=== VIRTUAL PET ===");
    println!(
        "  Hunger {:.1} | Happiness {:.1} | Energy {:.1} | Level {}",
        pet.stats.hunger, pet.stats.happiness, pet.stats.energy, pet.stats.level
    );
    println!("  Earned {} points for saving £25.00", earned);
    println!("  Leaderboard:");
    for entry in pet.leaderboard() {
        println!("    {} - {} pts", entry.name, entry.points);
    }

    // Financial health
    let mut profile = FinancialProfile::default();
    profile.income.monthly_net_income = 2_800.0;
    profile.expenses.monthly_essential_expenses = 1_400.0;
    profile.expenses.monthly_discretionary = 600.0;
    profile.savings.monthly_savings = 400.0;
    profile.savings.liquid_assets = 5_000.0;
    profile.debt.monthly_debt_payment = 250.0;
    profile.debt.credit_utilization = 20.0;

    let report = calculate_health(&profile)?;
    println!("\n=== FINANCIAL HEALTH ===");
    println!("  Score: {:.2} ({})", report.score, report.category);
    for rec in &report.recommendations {
        println!("  - {}", rec);
    }

    Ok(())
}
