//! Structured log helpers.
//!
//! Every line carries the emitting `component` so logs from the coordinator,
//! responder and notary of one process can be told apart.

/// Log an event with a component field.
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a transaction-related event with standard fields.
#[macro_export]
macro_rules! log_tx_event {
    ($level:ident, $component:expr, $msg:expr, $tx_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            tx_id = %$tx_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a party-related event with standard fields.
#[macro_export]
macro_rules! log_party_event {
    ($level:ident, $component:expr, $msg:expr, $party:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            party = %$party,
            $($($field)*,)?
            $msg
        )
    };
}
