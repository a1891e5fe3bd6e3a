use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::{
    api::FinanceApi,
    app::use_app,
    components::{error_text, page_shell},
    error::ApiError,
    format::format_money,
    models::{StatsTable, Summary},
    pages::report_failure,
    request::use_request_tracker,
    session::SessionContext,
};

const LOAD_FAILED: &str = "Impossible de récupérer les statistiques.";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statistics {
    pub categories: StatsTable,
    pub months: StatsTable,
    pub summary: Option<Summary>,
}

/// Fetch the three reports concurrently. Any failure discards the others.
pub async fn load_statistics<A: FinanceApi>(
    api: &A,
    session: &SessionContext,
) -> Result<Statistics, ApiError> {
    let session = session.require()?;
    let token = session.token.as_str();

    let (categories, months, summary) = tokio::try_join!(
        api.category_stats(token),
        api.monthly_stats(token),
        api.summary(token),
    )?;

    Ok(Statistics {
        categories,
        months,
        summary,
    })
}

/// Bar width as a percentage of the largest value in the table.
fn bar_width(value: f64, peak: f64) -> String {
    let ratio = if peak > 0.0 && value.is_finite() {
        (value / peak * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    format!("width: {ratio:.1}%")
}

fn stats_section(title: &'static str, table: &StatsTable) -> Html {
    let peak = table.peak();

    html! {
        <div class="bg-gray-800 rounded-2xl shadow-lg p-6">
            <h2 class="text-xl font-semibold mb-4">{ title }</h2>
            { if table.is_empty() {
                html! { <p class="text-gray-400">{"Aucune donnée à afficher."}</p> }
            } else {
                html! {
                    <div class="space-y-4">
                        { for table.rows().iter().map(|row| html! {
                            <div key={row.label.clone()}>
                                <div class="flex justify-between text-sm mb-1">
                                    <span class="font-medium">{ &row.label }</span>
                                    <span class="text-gray-400">
                                        { format!("{} / {}", format_money(row.totals.income), format_money(row.totals.expense)) }
                                    </span>
                                </div>
                                <div class="h-2 bg-gray-700 rounded mb-1">
                                    <div class="h-2 bg-emerald-500 rounded" style={bar_width(row.totals.income, peak)}></div>
                                </div>
                                <div class="h-2 bg-gray-700 rounded">
                                    <div class="h-2 bg-rose-500 rounded" style={bar_width(row.totals.expense, peak)}></div>
                                </div>
                            </div>
                        }) }
                    </div>
                }
            }}
        </div>
    }
}

fn summary_card(label: &'static str, amount: f64, class: &'static str) -> Html {
    html! {
        <div class="bg-gray-800 rounded-2xl shadow-lg p-5">
            <p class="text-gray-400 text-sm">{ label }</p>
            <p class={classes!("text-2xl", "font-bold", class)}>{ format_money(amount) }</p>
        </div>
    }
}

#[function_component(StatisticsPage)]
pub fn statistics_page() -> Html {
    let app = use_app();
    let tracker = use_request_tracker();
    let statistics = use_state(|| None::<Statistics>);
    let error = use_state(|| None::<String>);

    {
        let statistics = statistics.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |_| {
                let ticket = tracker.begin();
                spawn_local(async move {
                    let result = load_statistics(app.api.as_ref(), &app.session).await;
                    if !ticket.is_current() {
                        return;
                    }
                    match result {
                        Ok(loaded) => statistics.set(Some(loaded)),
                        Err(failure) => report_failure(failure, LOAD_FAILED, &error, &app.navigate),
                    }
                });
                || ()
            },
            (),
        );
    }

    let body = match (&*statistics, &*error) {
        (_, Some(_)) => error_text(&error),
        (None, None) => html! { <p class="text-gray-300">{"Chargement des statistiques..."}</p> },
        (Some(stats), None) => html! {
            <>
                if let Some(summary) = stats.summary {
                    <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4">
                        { summary_card("Total Revenus", summary.total_income, "text-emerald-400") }
                        { summary_card("Total Dépenses", summary.total_expense, "text-rose-400") }
                        { summary_card("Solde", summary.balance, "text-white") }
                        { summary_card("Budget", summary.budget, "text-sky-400") }
                    </div>
                }
                <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                    { stats_section("Par catégorie", &stats.categories) }
                    { stats_section("Par mois", &stats.months) }
                </div>
            </>
        },
    };

    page_shell("Statistiques", html! {}, body)
}
