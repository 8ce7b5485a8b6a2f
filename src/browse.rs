use crate::api::CardApi;
use crate::card::CardRecord;
use crate::error::FetchError;
use crate::filter::{CardView, RangeSpec, SortDirection, SortKey};
use inquire::{InquireError, Select, Text};
use tracing::warn;

/// What the user has picked so far in a browse session.
struct Selection {
    hp: String,
    range: Option<RangeSpec>,
    sort: SortKey,
    direction: SortDirection,
    view: CardView,
}

impl Selection {
    fn visible(&self) -> Vec<&CardRecord> {
        self.view
            .sorted(self.sort, self.direction)
            .into_iter()
            .filter(|card| self.range.map_or(true, |range| range.contains(card.hp)))
            .collect()
    }
}

pub async fn run(api: &CardApi) {
    let user_name = whoami::username();
    println!("Hi, {}! Welcome to the Card Browser.", user_name);

    let mut catalog = match api.fetch_catalog().await {
        Ok(catalog) => catalog,
        Err(e) => {
            report(&e);
            Vec::new()
        }
    };
    let mut selection = Selection {
        hp: String::new(),
        range: None,
        sort: SortKey::Name,
        direction: SortDirection::Ascending,
        view: CardView::default(),
    };

    loop {
        let menu_options: Vec<&str> = vec![
            "Select HP",
            "Set HP range",
            "Sort cards",
            "Show cards",
            "Refresh",
            "Exit",
        ];
        let menu_ans: Result<&str, InquireError> =
            Select::new("What would you like to do?", menu_options).prompt();

        match menu_ans {
            Ok("Select HP") => {
                if catalog.is_empty() {
                    println!("No HP values available. Try Refresh.");
                    continue;
                }
                if let Ok(hp) = Select::new("Select an HP:", catalog.clone()).prompt() {
                    selection.hp = hp;
                    selection.range = None;
                    load_cards(api, &mut selection).await;
                    show_cards(&selection);
                }
            }
            Ok("Set HP range") => {
                let Ok(input) = Text::new("HP range (MIN-MAX, empty to clear):").prompt() else {
                    continue;
                };
                if input.trim().is_empty() {
                    selection.range = None;
                } else {
                    match RangeSpec::parse(&input) {
                        Ok(range) => selection.range = Some(range),
                        Err(e) => {
                            println!("{}", e);
                            continue;
                        }
                    }
                }
                show_cards(&selection);
            }
            Ok("Sort cards") => {
                let labels: Vec<&str> = SortKey::ALL.iter().map(|key| key.label()).collect();
                if let Ok(label) = Select::new("Sort by:", labels).prompt() {
                    if let Some(key) = SortKey::ALL.iter().find(|key| key.label() == label) {
                        selection.direction = if selection.sort == *key
                            && selection.direction == SortDirection::Ascending
                        {
                            SortDirection::Descending
                        } else {
                            SortDirection::Ascending
                        };
                        selection.sort = *key;
                    }
                }
                show_cards(&selection);
            }
            Ok("Show cards") => show_cards(&selection),
            Ok("Refresh") => {
                let (catalog_result, cards_result) =
                    futures::join!(api.fetch_catalog(), api.search_cards(&selection.hp));
                match catalog_result {
                    Ok(fresh) => catalog = fresh,
                    Err(e) => report(&e),
                }
                match cards_result {
                    Ok(cards) => selection.view = CardView::new(cards),
                    Err(e) => report(&e),
                }
                show_cards(&selection);
            }
            Ok("Exit") => break,
            Ok(_) => println!("Invalid choice"),
            Err(_) => println!("There was an error, please try again"),
        }
    }
}

async fn load_cards(api: &CardApi, selection: &mut Selection) {
    println!("Loading cards...");
    match api.search_cards(&selection.hp).await {
        Ok(cards) => selection.view = CardView::new(cards),
        Err(e) => {
            report(&e);
            selection.view = CardView::default();
        }
    }
}

fn show_cards(selection: &Selection) {
    if selection.hp.is_empty() && selection.view.is_empty() {
        println!("Select an HP or a range of HP to start browsing.");
        return;
    }
    let cards = selection.visible();
    if cards.is_empty() {
        println!("No cards found.");
        return;
    }
    let order = match selection.direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
    };
    println!(
        "{} cards, sorted by {} ({}):",
        cards.len(),
        selection.sort.label(),
        order
    );
    print_cards(&cards);
}

pub fn print_cards(cards: &[&CardRecord]) {
    for card in cards {
        println!("{}", card_line(card));
    }
}

pub fn card_line(card: &CardRecord) -> String {
    format!(
        "[{}] {} | {} | Cost: {} | Power: {} | HP: {} | {}",
        card.id, card.name, card.card_type, card.cost, card.power, card.hp, card.rarity
    )
}

pub fn report(e: &FetchError) {
    warn!(kind = %e.kind(), "{}", e);
    println!("{}", e.user_message());
}
