use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::{
    api::FinanceApi,
    app::use_app,
    balance::derived_balance,
    browser,
    components::{bind_field, bind_select, error_text, page_shell},
    error::{ApiError, FormError},
    format::{format_money, type_label},
    models::{parse_amount, Transaction, TransactionDraft, TransactionType},
    pages::report_failure,
    request::use_request_tracker,
    transaction_service::TransactionService,
};

const LOAD_FAILED: &str = "Impossible de charger les transactions.";
const CREATE_FAILED: &str = "Impossible de créer la transaction.";
const UPDATE_FAILED: &str = "Impossible de mettre à jour la transaction.";
const DELETE_FAILED: &str = "Impossible de supprimer la transaction.";
const CONFIRM_DELETE: &str = "Voulez-vous vraiment supprimer cette transaction ?";

/// The raw contents of the create and edit forms.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionForm {
    pub category_name: String,
    pub title: String,
    pub amount: String,
    pub kind: TransactionType,
    pub date: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            category_name: String::new(),
            title: String::new(),
            amount: String::new(),
            kind: TransactionType::Expense,
            date: String::new(),
        }
    }
}

impl TransactionForm {
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            category_name: transaction.category_name().unwrap_or_default().to_string(),
            title: transaction.title.clone(),
            amount: transaction.amount.to_string(),
            kind: transaction.kind.clone(),
            date: transaction.date.clone(),
        }
    }

    /// Required fields are enforced by the browser; only the amount is
    /// checked here.
    pub fn to_draft(&self) -> Result<TransactionDraft, FormError> {
        let amount = parse_amount(&self.amount)
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| FormError::InvalidAmount(self.amount.clone()))?;

        Ok(TransactionDraft {
            category_name: self.category_name.clone(),
            title: self.title.clone(),
            amount,
            kind: self.kind.clone(),
            date: self.date.clone(),
        })
    }
}

/// Create a transaction, or update `id` when given.
pub async fn save_draft<A: FinanceApi>(
    service: &TransactionService<A>,
    id: Option<i64>,
    draft: &TransactionDraft,
) -> Result<(), ApiError> {
    match id {
        Some(id) => service.update(id, draft).await,
        None => service.create(draft).await,
    }
}

/// The create and edit dialogs share their fields.
fn form_fields(form: &UseStateHandle<TransactionForm>) -> Html {
    html! {
        <>
            <input type="text" placeholder="Catégorie" class="input input-bordered w-full"
                value={form.category_name.clone()}
                oninput={bind_field(form, |f, value| f.category_name = value)} required=true />
            <input type="text" placeholder="Titre" class="input input-bordered w-full"
                value={form.title.clone()}
                oninput={bind_field(form, |f, value| f.title = value)} required=true />
            <input type="number" step="any" placeholder="Montant" class="input input-bordered w-full"
                value={form.amount.clone()}
                oninput={bind_field(form, |f, value| f.amount = value)} required=true />
            <select class="select select-bordered w-full"
                onchange={bind_select(form, |f, value| f.kind = TransactionType::from(value))} required=true>
                <option value="income" selected={form.kind == TransactionType::Income}>{"Entrée"}</option>
                <option value="expense" selected={form.kind != TransactionType::Income}>{"Sortie"}</option>
            </select>
            <input type="date" class="input input-bordered w-full"
                value={form.date.clone()}
                oninput={bind_field(form, |f, value| f.date = value)} required=true />
        </>
    }
}

/// Split an error between the page and the open dialog, which covers the page.
fn error_placement(error: &Option<String>, dialog_open: bool) -> (Option<String>, Option<String>) {
    if dialog_open {
        (None, error.clone())
    } else {
        (error.clone(), None)
    }
}

fn modal(
    title: &'static str,
    busy: bool,
    error: &Option<String>,
    on_submit: Callback<SubmitEvent>,
    on_cancel: Callback<MouseEvent>,
    fields: Html,
) -> Html {
    html! {
        <div class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center z-50">
            <div class="bg-gray-800 p-6 rounded-2xl shadow-xl w-full max-w-md">
                <h3 class="text-xl font-bold mb-4">{ title }</h3>
                <form onsubmit={on_submit} class="space-y-3">
                    { fields }
                    { error_text(error) }
                    <div class="flex justify-end gap-2 pt-2">
                        <button type="button" class="btn" onclick={on_cancel}>{"Annuler"}</button>
                        <button type="submit" class="btn btn-primary" disabled={busy}>
                            { if busy { "Enregistrement..." } else { "Enregistrer" } }
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

#[function_component(TransactionsPage)]
pub fn transactions_page() -> Html {
    let app = use_app();
    let tracker = use_request_tracker();
    let service = use_state(|| {
        Rc::new(TransactionService::new(
            app.api.clone(),
            app.session.clone(),
        ))
    });
    let transactions = use_state(Vec::<Transaction>::new);
    let error = use_state(|| None::<String>);
    let show_create = use_state(|| false);
    let create_form = use_state(TransactionForm::default);
    let editing_id = use_state(|| None::<i64>);
    let edit_form = use_state(TransactionForm::default);
    let saving = use_state(|| false);

    // Fetches the full list and replaces the table.
    let reload = {
        let service = (*service).clone();
        let transactions = transactions.clone();
        let error = error.clone();
        let navigate = app.navigate.clone();
        let tracker = tracker.clone();
        Callback::from(move |_: ()| {
            let service = service.clone();
            let transactions = transactions.clone();
            let error = error.clone();
            let navigate = navigate.clone();
            let ticket = tracker.begin();
            spawn_local(async move {
                let result = service.list(None).await;
                if !ticket.is_current() {
                    return;
                }
                match result {
                    Ok(list) => transactions.set(list),
                    Err(failure) => report_failure(failure, LOAD_FAILED, &error, &navigate),
                }
            });
        })
    };

    {
        let reload = reload.clone();
        use_effect_with_deps(
            move |_| {
                reload.emit(());
                || ()
            },
            (),
        );
    }

    // Shared by the create and edit dialogs.
    let submit = |form: UseStateHandle<TransactionForm>, target: Option<i64>, fallback: &'static str| {
        let service = (*service).clone();
        let error = error.clone();
        let navigate = app.navigate.clone();
        let tracker = tracker.clone();
        let reload = reload.clone();
        let show_create = show_create.clone();
        let editing_id = editing_id.clone();
        let saving = saving.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let draft = match form.to_draft() {
                Ok(draft) => draft,
                Err(invalid) => {
                    error.set(Some(invalid.to_string()));
                    return;
                }
            };

            let service = service.clone();
            let error = error.clone();
            let navigate = navigate.clone();
            let reload = reload.clone();
            let form = form.clone();
            let show_create = show_create.clone();
            let editing_id = editing_id.clone();
            let tracker = tracker.clone();
            let saving = saving.clone();
            saving.set(true);
            spawn_local(async move {
                let result = save_draft(&service, target, &draft).await;
                if !tracker.is_mounted() {
                    return;
                }
                saving.set(false);
                match result {
                    Ok(()) => {
                        error.set(None);
                        form.set(TransactionForm::default());
                        show_create.set(false);
                        editing_id.set(None);
                        reload.emit(());
                    }
                    Err(failure) => report_failure(failure, fallback, &error, &navigate),
                }
            });
        })
    };
    let on_create = submit(create_form.clone(), None, CREATE_FAILED);
    let on_update = submit(edit_form.clone(), *editing_id, UPDATE_FAILED);

    let on_open_create = {
        let show_create = show_create.clone();
        Callback::from(move |_| show_create.set(true))
    };
    let on_close_create = {
        let show_create = show_create.clone();
        Callback::from(move |_| show_create.set(false))
    };
    let on_close_edit = {
        let editing_id = editing_id.clone();
        Callback::from(move |_| editing_id.set(None))
    };

    let total = derived_balance(transactions.iter());
    let (page_error, dialog_error) =
        error_placement(&error, *show_create || editing_id.is_some());

    let rows = transactions.iter().map(|t| {
        let on_edit = {
            let editing_id = editing_id.clone();
            let edit_form = edit_form.clone();
            let transaction = t.clone();
            Callback::from(move |_| {
                edit_form.set(TransactionForm::from_transaction(&transaction));
                editing_id.set(Some(transaction.id));
            })
        };
        let on_delete = {
            let id = t.id;
            let service = (*service).clone();
            let error = error.clone();
            let navigate = app.navigate.clone();
            let reload = reload.clone();
            let tracker = tracker.clone();
            Callback::from(move |_| {
                if !browser::confirm(CONFIRM_DELETE) {
                    return;
                }
                let service = service.clone();
                let error = error.clone();
                let navigate = navigate.clone();
                let reload = reload.clone();
                let tracker = tracker.clone();
                spawn_local(async move {
                    let result = service.delete(id).await;
                    if !tracker.is_mounted() {
                        return;
                    }
                    match result {
                        Ok(()) => reload.emit(()),
                        Err(failure) => report_failure(failure, DELETE_FAILED, &error, &navigate),
                    }
                });
            })
        };
        let type_class = if t.kind == TransactionType::Income {
            "text-emerald-400 font-semibold"
        } else {
            "text-rose-400 font-semibold"
        };

        html! {
            <tr key={t.id} class="hover:bg-gray-700">
                <td class="px-4 py-2">{ &t.title }</td>
                <td class="px-4 py-2">{ format_money(t.amount) }</td>
                <td class="px-4 py-2">{ t.category_name().unwrap_or("N/A").to_string() }</td>
                <td class={classes!("px-4", "py-2", type_class)}>{ type_label(&t.kind) }</td>
                <td class="px-4 py-2">{ &t.date }</td>
                <td class="px-4 py-2 flex gap-2">
                    <button class="btn btn-sm btn-warning" onclick={on_edit}>{"Modifier"}</button>
                    <button class="btn btn-sm btn-error" onclick={on_delete}>{"Supprimer"}</button>
                </td>
            </tr>
        }
    });

    page_shell(
        "Transactions",
        html! {
            <div class="bg-gray-800 px-4 py-2 rounded-xl font-semibold">
                { format!("Solde : {}", format_money(total)) }
            </div>
        },
        html! {
            <>
                <button class="btn btn-primary" onclick={on_open_create}>{"➕ Ajouter une transaction"}</button>

                { error_text(&page_error) }

                <div class="bg-gray-800 rounded-2xl shadow-lg overflow-x-auto">
                    { if transactions.is_empty() {
                        html! { <p class="p-6 text-gray-300">{"Aucune transaction."}</p> }
                    } else {
                        html! {
                            <table class="w-full text-left">
                                <thead>
                                    <tr class="text-gray-400 text-sm uppercase">
                                        <th class="px-4 py-2">{"Titre"}</th>
                                        <th class="px-4 py-2">{"Montant"}</th>
                                        <th class="px-4 py-2">{"Catégorie"}</th>
                                        <th class="px-4 py-2">{"Type"}</th>
                                        <th class="px-4 py-2">{"Date"}</th>
                                        <th class="px-4 py-2">{"Actions"}</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    { for rows }
                                </tbody>
                            </table>
                        }
                    }}
                </div>

                if *show_create {
                    { modal("Nouvelle transaction", *saving, &dialog_error, on_create, on_close_create, form_fields(&create_form)) }
                }
                if editing_id.is_some() {
                    { modal("Modifier la transaction", *saving, &dialog_error, on_update, on_close_edit, form_fields(&edit_form)) }
                }
            </>
        },
    )
}
