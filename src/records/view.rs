use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_CONTAINER_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, link,
    },
    ledger::{Category, Record, RecordKind},
    navigation::NavBar,
    records::{
        delete_endpoint, edit_endpoint,
        form::{RecordFormDefaults, record_form_fields},
        list_endpoint, report_endpoint,
    },
    report::ReportDuration,
};

pub fn records_view(
    kind: RecordKind,
    records: &[Record],
    categories: &[Category],
    defaults: &RecordFormDefaults<'_>,
) -> Markup {
    let nav_bar = NavBar::new(list_endpoint(kind)).into_html();
    let total: f64 = records.iter().map(|record| record.amount).sum();
    let form_id = format!("create-{kind}-form");

    let content = html!(
        (nav_bar)

        div class={(PAGE_CONTAINER_STYLE) " max-w-screen-xl gap-6"}
        {
            h1 class="text-2xl font-bold" { (kind.plural()) }

            div class="w-full max-w-md"
            {
                h2 class="text-xl font-semibold mb-4" { "Add " (kind.label().to_lowercase()) }

                @if categories.is_empty() {
                    p
                    {
                        "You need at least one " (kind.label().to_lowercase())
                        " category before you can add " (kind.plural().to_lowercase()) ". Add one in "
                        (link(endpoints::SETTINGS, "settings"))
                        "."
                    }
                } @else {
                    form
                        id=(form_id)
                        method="post"
                        action=(list_endpoint(kind))
                        class="space-y-4"
                    {
                        (record_form_fields(defaults, categories))

                        button type="submit" class=(BUTTON_PRIMARY_STYLE)
                        {
                            "Add " (kind.label().to_lowercase())
                        }
                    }
                }
            }

            (report_links(kind))

            (records_table(kind, records, total))
        }
    );

    base(kind.plural(), &[], &content)
}

fn report_links(kind: RecordKind) -> Markup {
    html! {
        p id="report-links"
        {
            "Download report: "
            @for (index, duration) in ReportDuration::ALL.into_iter().enumerate() {
                @if index > 0 { " | " }
                a
                    href=(report_endpoint(kind, duration.keyword()))
                    class=(LINK_STYLE)
                    download
                {
                    (duration.label())
                }
            }
        }
    }
}

fn records_table(kind: RecordKind, records: &[Record], total: f64) -> Markup {
    html! {
        div class="relative w-full overflow-x-auto shadow-md rounded-lg"
        {
            table id=(format!("{kind}-table")) class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                        th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                    }
                }

                tbody
                {
                    @if records.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="6" class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "Nothing here yet."
                            }
                        }
                    }

                    // Newest first.
                    @for record in records.iter().rev() {
                        tr class=(TABLE_ROW_STYLE) data-record-id=(record.id)
                        {
                            td class=(TABLE_CELL_STYLE) { (record.date) }
                            td class=(TABLE_CELL_STYLE) { (record.name) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                span class=(CATEGORY_BADGE_STYLE) { (record.category_name) }
                            }
                            td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(record.amount)) }
                            td class=(TABLE_CELL_STYLE) { (record.note.as_deref().unwrap_or_default()) }
                            td class={(TABLE_CELL_STYLE) " flex gap-4"}
                            {
                                a href=(edit_endpoint(kind, record.id)) class=(LINK_STYLE) { "Edit" }

                                form
                                    method="post"
                                    action=(delete_endpoint(kind, record.id))
                                {
                                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                                }
                            }
                        }
                    }
                }

                tfoot
                {
                    tr class="font-semibold text-gray-900 dark:text-white"
                    {
                        th scope="row" colspan="3" class=(TABLE_CELL_STYLE) { "Total" }
                        td id="total" class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(total)) }
                        td colspan="2" {}
                    }
                }
            }
        }
    }
}

pub fn edit_record_view(kind: RecordKind, record: &Record, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(list_endpoint(kind)).into_html();
    let title = format!("Edit {}", kind.label());

    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { (title) }

            form
                id="edit-record-form"
                method="post"
                action=(edit_endpoint(kind, record.id))
                class="w-full space-y-4"
            {
                (record_form_fields(&RecordFormDefaults::from_record(record), categories))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save changes" }
            }

            p class="mt-4" { (link(list_endpoint(kind), "Cancel")) }
        }
    );

    base(&title, &[], &content)
}
