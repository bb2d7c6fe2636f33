//! HTML Pages
//!
//! Server-rendered checkout pages. Every interpolated value goes through
//! `html_escape`, including the status text inside a failure message.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use checkout_core::{ClientToken, OutcomeResult, Transaction};

/// Braintree Drop-in UI served from Braintree's CDN
const DROPIN_SCRIPT: &str = "https://js.braintreegateway.com/web/dropin/1.43.0/js/dropin.min.js";

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/static/stylesheets/app.css">
</head>
<body>
{body}
</body>
</html>
"#,
        title = encode_text(title),
    )
}

/// Checkout form with the Drop-in UI and any flash messages
pub fn checkout_form(client_token: &ClientToken, messages: &[String]) -> String {
    let mut body = String::new();

    for message in messages {
        let _ = writeln!(
            body,
            r#"<div class="notice-wrapper"><div class="notice error">{}</div></div>"#,
            encode_text(message)
        );
    }

    let _ = write!(
        body,
        r#"<main class="container">
  <h1>Hi, <br>Let's test a transaction</h1>
  <p>Make a test payment with Braintree using PayPal or a card</p>
  <form id="payment-form" method="post" action="/checkouts">
    <label for="amount">Amount</label>
    <input id="amount" name="amount" type="tel" min="1" placeholder="Amount" value="10">
    <div id="bt-dropin" data-client-token="{token}"></div>
    <input type="hidden" id="nonce" name="payment_method_nonce">
    <button class="button" type="submit"><span>Test Transaction</span></button>
  </form>
</main>
<script src="{DROPIN_SCRIPT}"></script>
<script src="/static/javascripts/checkout.js"></script>"#,
        token = encode_double_quoted_attribute(client_token.as_str()),
    );

    layout("Braintree Checkout", &body)
}

/// Result page for a transaction
pub fn transaction_page(transaction: &Transaction, result: &OutcomeResult) -> String {
    let mut rows = String::new();
    let mut row = |label: &str, value: &str| {
        let _ = writeln!(
            rows,
            "      <tr><td>{}</td><td>{}</td></tr>",
            encode_text(label),
            encode_text(value)
        );
    };

    row("id", &transaction.id);
    if let Some(legacy_id) = &transaction.legacy_id {
        row("legacy id", legacy_id);
    }
    row("status", transaction.status.as_str());
    row("amount", &transaction.amount.to_string());
    if let Some(currency) = &transaction.currency_iso_code {
        row("currency", currency);
    }
    if let Some(created_at) = &transaction.created_at {
        row("created at", &created_at.to_rfc3339());
    }
    if let Some(code) = &transaction.processor_response_code {
        row("processor response code", code);
    }
    if let Some(text) = &transaction.processor_response_text {
        row("processor response text", text);
    }
    if let Some(instrument) = &transaction.payment_instrument {
        row("payment method", &instrument.kind);
        if let Some(card_type) = &instrument.card_type {
            row("card type", card_type);
        }
        if let Some(last4) = &instrument.last4 {
            row("last 4", last4);
        }
        if let Some(expiration) = &instrument.expiration_date {
            row("expiration date", expiration);
        }
        if let Some(email) = &instrument.payer_email {
            row("payer email", email);
        }
    }
    if let Some(customer) = &transaction.customer {
        for (label, value) in [
            ("customer first name", &customer.first_name),
            ("customer last name", &customer.last_name),
            ("customer email", &customer.email),
            ("customer phone", &customer.phone),
        ] {
            if let Some(value) = value {
                row(label, value);
            }
        }
    }

    let body = format!(
        r#"<main class="container response">
  <div class="icon"><img src="/static/images/{icon}.svg" alt="{icon}"></div>
  <h1>{header}</h1>
  <section>
    <p>{message}</p>
    <p><a class="button primary back" href="/checkouts/new"><span>Test Another Transaction</span></a></p>
  </section>
  <section>
    <h5>API Response</h5>
    <table cellpadding="0" cellspacing="0">
      <tbody>
{rows}      </tbody>
    </table>
  </section>
</main>"#,
        icon = result.icon,
        header = encode_text(&result.header),
        message = encode_text(&result.message),
    );

    layout(&result.header, &body)
}

/// Plain error page
pub fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        r#"<main class="container response">
  <h1>{}</h1>
  <p>{}</p>
  <p><a class="button" href="/checkouts/new"><span>Back to checkout</span></a></p>
</main>"#,
        encode_text(title),
        encode_text(message),
    );
    layout(title, &body)
}
