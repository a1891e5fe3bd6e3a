use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::{
    api::FinanceApi,
    app::use_app,
    balance::derived_balance,
    components::{icon_bar_chart, icon_home, icon_list, icon_log_out, icon_menu, icon_user},
    config::RECENT_TRANSACTION_LIMIT,
    error::ApiError,
    format::{format_money, type_class},
    models::{Transaction, User},
    pages::{
        profile::ProfilePage, report_failure, statistics::StatisticsPage,
        transactions::TransactionsPage,
    },
    request::use_request_tracker,
    route::{DashboardTab, Route},
    transaction_service::TransactionService,
};

const LOAD_FAILED: &str = "Erreur lors du chargement des transactions";

/// The latest transactions and the balance derived from them.
///
/// The balance only covers the fetched page, not the whole history.
pub async fn load_recent<A: FinanceApi>(
    service: &TransactionService<A>,
) -> Result<(Vec<Transaction>, f64), ApiError> {
    let recent = service.list(Some(RECENT_TRANSACTION_LIMIT)).await?;
    let balance = derived_balance(&recent);
    Ok((recent, balance))
}

fn welcome_title(user: Option<&User>) -> String {
    match user {
        Some(user) => format!("Bienvenue, {}", user.name),
        None => "Dashboard".to_string(),
    }
}

/// The balance of the recent page once loaded, the user's cached budget before.
fn displayed_budget(recent_balance: Option<f64>, user: Option<&User>) -> f64 {
    recent_balance
        .or_else(|| user.and_then(|user| user.budget))
        .unwrap_or(0.0)
}

struct NavItem {
    label: &'static str,
    tab: DashboardTab,
    icon: fn() -> Html,
}

static NAV_ITEMS: [NavItem; 4] = [
    NavItem {
        label: "Dashboard",
        tab: DashboardTab::Home,
        icon: icon_home,
    },
    NavItem {
        label: "Transactions",
        tab: DashboardTab::Transactions,
        icon: icon_list,
    },
    NavItem {
        label: "Profil",
        tab: DashboardTab::Profile,
        icon: icon_user,
    },
    NavItem {
        label: "Statistiques",
        tab: DashboardTab::Statistics,
        icon: icon_bar_chart,
    },
];

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    pub tab: DashboardTab,
}

#[function_component(DashboardPage)]
pub fn dashboard_page(props: &DashboardProps) -> Html {
    let app = use_app();
    let tracker = use_request_tracker();
    let sidebar_open = use_state(|| true);
    let recent_balance = use_state(|| None::<f64>);
    let transactions = use_state(Vec::<Transaction>::new);
    let error = use_state(|| None::<String>);
    let service = use_state(|| {
        Rc::new(TransactionService::new(
            app.api.clone(),
            app.session.clone(),
        ))
    });

    {
        let navigate = app.navigate.clone();
        let service = (*service).clone();
        let transactions = transactions.clone();
        let recent_balance = recent_balance.clone();
        let error = error.clone();
        let tracker = tracker.clone();
        use_effect_with_deps(
            move |_| {
                let ticket = tracker.begin();
                spawn_local(async move {
                    let result = load_recent(service.as_ref()).await;
                    if !ticket.is_current() {
                        return;
                    }
                    match result {
                        Ok((recent, balance)) => {
                            transactions.set(recent);
                            recent_balance.set(Some(balance));
                        }
                        Err(failure) => report_failure(failure, LOAD_FAILED, &error, &navigate),
                    }
                });
                || ()
            },
            (),
        );
    }

    let on_toggle_sidebar = {
        let sidebar_open = sidebar_open.clone();
        Callback::from(move |_| sidebar_open.set(!*sidebar_open))
    };

    let on_logout = {
        let session = app.session.clone();
        let navigate = app.navigate.clone();
        Callback::from(move |_| {
            session.clear();
            navigate.emit(Route::Login);
        })
    };

    // Read on every render so a profile update shows up right away.
    let user = app.session.load().map(|session| session.user);
    let budget = displayed_budget(*recent_balance, user.as_ref());

    let outlet = match props.tab {
        DashboardTab::Home => html! {},
        DashboardTab::Transactions => html! { <TransactionsPage /> },
        DashboardTab::Profile => html! { <ProfilePage /> },
        DashboardTab::Statistics => html! { <StatisticsPage /> },
    };

    let (sidebar_width, content_margin) = if *sidebar_open {
        ("w-64", "ml-64")
    } else {
        ("w-16", "ml-16")
    };

    html! {
        <div class="flex min-h-screen bg-gradient-to-b from-gray-900 via-gray-800 to-gray-700 text-white">
            <div class={classes!("bg-gray-900", "flex", "flex-col", "justify-between", "fixed", "h-screen", "overflow-hidden", "transition-all", sidebar_width)}>
                <div class="p-4">
                    <button class="mb-6 text-gray-300 hover:text-white text-xl" onclick={on_toggle_sidebar}>
                        { icon_menu() }
                    </button>
                    if *sidebar_open {
                        <h2 class="text-2xl font-bold mb-6">{"MoneyWise"}</h2>
                    }
                    <nav class="flex flex-col gap-3">
                        { for NAV_ITEMS.iter().map(|item| {
                            let navigate = app.navigate.clone();
                            let route = Route::Dashboard(item.tab);
                            let class_name = if item.tab == props.tab {
                                "flex items-center gap-3 p-3 bg-gray-800 rounded-lg transition"
                            } else {
                                "flex items-center gap-3 p-3 hover:bg-gray-800 rounded-lg transition"
                            };
                            html! {
                                <a href={route.path()} class={class_name} onclick={Callback::from(move |e: MouseEvent| {
                                    e.prevent_default();
                                    navigate.emit(route);
                                })}>
                                    { (item.icon)() }
                                    if *sidebar_open { { item.label } }
                                </a>
                            }
                        }) }
                    </nav>
                </div>

                <div class="p-4">
                    <button onclick={on_logout} class="flex items-center gap-2 w-full bg-red-600 hover:bg-red-700 py-3 px-4 rounded-lg shadow-lg transition">
                        { icon_log_out() }
                        if *sidebar_open { {"Déconnexion"} }
                    </button>
                </div>
            </div>

            <div class={classes!("flex-1", "p-8", "overflow-y-auto", "relative", content_margin)}>
                <div class="flex items-center justify-between mb-8">
                    <h1 class="text-3xl font-bold text-white tracking-wide">
                        { welcome_title(user.as_ref()) }
                    </h1>
                    <div class="bg-gray-800 bg-opacity-70 px-6 py-3 rounded-2xl shadow-lg font-semibold text-white border border-gray-700">
                        { format!("Budget : {}", format_money(budget)) }
                    </div>
                </div>

                if let Some(message) = &*error {
                    <p class="text-red-400 mb-4">{ message.clone() }</p>
                }

                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                    { if transactions.is_empty() {
                        html! {
                            <div class="bg-gray-800 bg-opacity-70 p-6 rounded-2xl shadow-lg text-white border border-gray-700">
                                {"Aucune transaction récente."}
                            </div>
                        }
                    } else {
                        html! {
                            <>{ for transactions.iter().map(|t| html! {
                                <div key={t.id} class="bg-gray-800 bg-opacity-70 p-6 rounded-xl shadow-md">
                                    <h3 class="text-lg font-semibold text-white mb-2">{ &t.title }</h3>
                                    <p class="text-white mb-1">{ format!("Montant : {}", format_money(t.amount)) }</p>
                                    <p class={type_class(&t.kind)}>{ format!("Type : {}", t.kind.as_str()) }</p>
                                    <p class="text-gray-200 text-sm mt-1">{ &t.date }</p>
                                </div>
                            }) }</>
                        }
                    }}
                </div>

                <div class="mt-8">
                    { outlet }
                </div>
            </div>
        </div>
    }
}
