use maud::{Markup, html};
use time::Date;

use crate::{
    expense::{DESCRIPTION_MAX_LENGTH, SHORT_TEXT_MAX_LENGTH},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The values to pre-fill the expense form with.
#[derive(Debug, Default)]
pub struct ExpenseFormDefaults<'a> {
    pub amount: Option<f64>,
    pub category: Option<&'a str>,
    pub description: Option<&'a str>,
    pub date: Option<Date>,
    pub payment_method: Option<&'a str>,
}

/// The inputs shared by the add and edit expense forms.
///
/// `categories` are offered as suggestions for the category input.
pub fn expense_form_fields(defaults: &ExpenseFormDefaults<'_>, categories: &[String]) -> Markup {
    let amount_str = defaults.amount.map(|amount| amount.to_string());
    let date_str = defaults.date.map(|date| date.to_string());

    html! {
        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="any"
                placeholder="0.00"
                required
                value=[amount_str.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            input
                name="category"
                id="category"
                type="text"
                placeholder="Other"
                list="category-options"
                maxlength=(SHORT_TEXT_MAX_LENGTH)
                value=[defaults.category]
                class=(FORM_TEXT_INPUT_STYLE);

            datalist id="category-options"
            {
                @for category in categories {
                    option value=(category) {}
                }
            }
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                maxlength=(DESCRIPTION_MAX_LENGTH)
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=[date_str.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="payment_method"
                class=(FORM_LABEL_STYLE)
            {
                "Payment method"
            }

            input
                name="payment_method"
                id="payment_method"
                type="text"
                placeholder="Card, cash, ..."
                maxlength=(SHORT_TEXT_MAX_LENGTH)
                value=[defaults.payment_method]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use super::{ExpenseFormDefaults, expense_form_fields};

    fn render(defaults: &ExpenseFormDefaults<'_>, categories: &[String]) -> Html {
        let fields = expense_form_fields(defaults, categories);
        let markup = maud::html! { form { (fields) } };
        Html::parse_document(&markup.into_string())
    }

    fn input_value(html: &Html, name: &str) -> Option<String> {
        let selector = Selector::parse(&format!("input[name={name}]")).unwrap();
        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("no input named {name}"))
            .value()
            .attr("value")
            .map(str::to_owned)
    }

    #[test]
    fn empty_defaults_leave_inputs_blank() {
        let html = render(&ExpenseFormDefaults::default(), &[]);

        for name in ["amount", "category", "description", "date", "payment_method"] {
            assert_eq!(input_value(&html, name), None, "want {name} to be blank");
        }
    }

    #[test]
    fn defaults_are_filled_in() {
        let html = render(
            &ExpenseFormDefaults {
                amount: Some(12.5),
                category: Some("Food"),
                description: Some("Lunch"),
                date: Some(date!(2024 - 01 - 15)),
                payment_method: Some("Card"),
            },
            &[],
        );

        assert_eq!(input_value(&html, "amount").as_deref(), Some("12.5"));
        assert_eq!(input_value(&html, "category").as_deref(), Some("Food"));
        assert_eq!(input_value(&html, "description").as_deref(), Some("Lunch"));
        assert_eq!(input_value(&html, "date").as_deref(), Some("2024-01-15"));
        assert_eq!(input_value(&html, "payment_method").as_deref(), Some("Card"));
    }

    #[test]
    fn categories_are_suggested() {
        let categories = vec!["Food".to_owned(), "Transport".to_owned()];

        let html = render(&ExpenseFormDefaults::default(), &categories);

        let options = html
            .select(&Selector::parse("datalist#category-options option").unwrap())
            .filter_map(|option| option.value().attr("value"))
            .collect::<Vec<_>>();
        assert_eq!(options, vec!["Food", "Transport"]);
    }
}
