//! Sample rows table

use dash_core::Table;
use leptos::prelude::*;

/// Table whose header comes from the first row's keys
#[component]
pub fn DataTable(#[prop(into)] table: Signal<Table>) -> impl IntoView {
    move || {
        let table = table.get();
        if table.is_empty() {
            return view! { <p class="dt-empty">"No rows"</p> }.into_any();
        }

        let columns = table.columns();
        let header = columns
            .iter()
            .map(|column| view! { <th class="dt-col">{column.clone()}</th> })
            .collect_view();
        let body = table
            .rows
            .iter()
            .map(|row| {
                let cells = columns
                    .iter()
                    .map(|column| view! { <td class="dt-cell">{Table::cell(row, column)}</td> })
                    .collect_view();
                view! { <tr class="dt-row">{cells}</tr> }
            })
            .collect_view();

        view! {
            <table class="data-table">
                <thead>
                    <tr>{header}</tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
        }
        .into_any()
    }
}
