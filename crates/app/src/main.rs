use api_types::bill::BillView;
use clap::{Parser, Subcommand};
use engine::{BalanceAggregator, BalanceSummary, BillPosition, Currency, Money, bill_balance};
use splitta_client::{
    ActivitySource, Client, ClientConfig, FeedLoader, LoadOutcome, PageSource, convert,
};
use uuid::Uuid;

type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "splitta")]
#[command(about = "Shared-expense balances from the accounting service")]
struct Cli {
    /// Configuration file (defaults to `config/splitta.toml`).
    #[arg(long)]
    config: Option<String>,

    /// Overrides `base_url` from the configuration.
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token (also read from `SPLITTA_TOKEN`).
    #[arg(long, env = "SPLITTA_TOKEN")]
    token: Option<String>,

    /// Id of the signed-in user; balances are computed from their side.
    #[arg(long)]
    user: Uuid,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Every bill visible to the user, newest first.
    Activity,
    /// Bills of one group with the group's totals.
    Group {
        id: Uuid,
        #[arg(long)]
        search: Option<String>,
    },
    /// Members of a group the user may remove.
    Members { id: Uuid },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let mut settings = splitta_client::config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if cli.token.is_some() {
        settings.token = cli.token;
    }

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "splitta={level},splitta_client={level},engine={level}",
            level = settings.level
        ))
        .init();

    let client = Client::new(&settings.base_url, settings.token.clone())?;

    match cli.command {
        Command::Activity => {
            let summary = print_feed(ActivitySource::new(client), &settings, cli.user).await?;
            print_summary(&summary);
        }
        Command::Group { id, search } => {
            let detail = client.group_detail(id).await?;
            println!("{}", detail.name);
            let mut source = splitta_client::GroupBillsSource::new(client, id);
            if let Some(search) = search {
                source = source.with_search(search);
            }
            let summary = print_feed(source, &settings, cli.user).await?;
            print_summary(&summary);
        }
        Command::Members { id } => {
            let detail = client.group_detail(id).await?;
            let group = convert::group_from_view(&detail)?;
            for membership in engine::removable_members(&group, cli.user) {
                let name = detail
                    .members
                    .iter()
                    .find(|member| member.id == membership.id)
                    .and_then(|member| member.user.name.clone())
                    .unwrap_or_else(|| membership.user_id.to_string());
                println!("{}\t{name}", membership.id);
            }
        }
    }

    Ok(())
}

/// Pages through the whole feed, printing each bill as it arrives.
async fn print_feed<S>(source: S, settings: &ClientConfig, viewer: Uuid) -> AppResult<BalanceSummary>
where
    S: PageSource<BillView>,
{
    let loader = FeedLoader::new(source, settings.page_size);
    let mut aggregator = BalanceAggregator::new(viewer);
    let mut printed = 0;

    let mut outcome = loader.load_more(true).await;
    loop {
        match outcome {
            LoadOutcome::Failed(err) => {
                tracing::error!("failed to load bills: {err}");
                break;
            }
            LoadOutcome::Skipped | LoadOutcome::Stale => break,
            LoadOutcome::Loaded { received: 0, has_more: true } => {
                tracing::warn!("service reported more bills but sent an empty page");
                break;
            }
            LoadOutcome::Loaded { .. } => {}
        }

        let page = loader.with_items(|items| items[printed..].to_vec());
        printed += page.len();
        for view in &page {
            match convert::bill_from_view(view) {
                Ok(bill) => {
                    print_bill(&bill, viewer);
                    aggregator.add(&bill);
                }
                Err(err) => tracing::warn!(bill_id = %view.id, "unreadable bill: {err}"),
            }
        }

        if !loader.has_more() {
            break;
        }
        outcome = loader.on_visibility(true).await;
    }

    Ok(aggregator.finish())
}

fn print_bill(bill: &engine::Bill, viewer: Uuid) {
    let balance = bill_balance(bill, viewer);
    let position = match balance.position {
        BillPosition::Lent(amount) => format!("you lent {}", fmt(amount)),
        BillPosition::Spent(amount) => format!("you spent {}", fmt(amount)),
        BillPosition::Owe(amount) => format!("you owe {}", fmt(amount)),
        BillPosition::NotInvolved => "not involved".to_string(),
    };
    let status = balance
        .status
        .map(|status| status.label(balance.is_payer))
        .unwrap_or("-");
    println!(
        "{}  {:<24} {:>12}  {position} ({status})",
        bill.created_at.format("%Y-%m-%d"),
        bill.description,
        fmt(bill.total)
    );
}

fn print_summary(summary: &BalanceSummary) {
    println!();
    println!("You are owed: {}", fmt(summary.owed));
    println!("You owe:      {}", fmt(summary.owe));
    println!("Net:          {}", fmt(summary.net()));
    if !summary.skipped.is_empty() {
        println!("Skipped {} malformed bill(s)", summary.skipped.len());
    }
}

fn fmt(amount: Money) -> String {
    amount.format(Currency::Inr)
}
