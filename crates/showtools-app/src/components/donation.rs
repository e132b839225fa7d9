use leptos::*;
use showtools::Selection;
use wasm_bindgen::JsValue;

use crate::site::Gate;

/// The download gate: pick an amount and pay, or skip straight to the file.
#[component]
pub fn DonationModal(gate: RwSignal<Gate>) -> impl IntoView {
    let presets = gate.with_untracked(|g| g.config().presets());

    let close = move |_| gate.update(|g| g.close_gate());

    // Only clicks on the overlay itself, not ones bubbling up from the dialog.
    let close_on_backdrop = move |ev: ev::MouseEvent| {
        let target: Option<JsValue> = ev.target().map(Into::into);
        let current: Option<JsValue> = ev.current_target().map(Into::into);
        if target == current {
            gate.update(|g| g.close_gate());
        }
    };

    let confirm = move |_| {
        gate.update(|g| {
            if let Err(e) = g.confirm_donation() {
                log::error!("Payment redirect failed: {}", e);
            }
        });
    };

    let skip = move |_| {
        gate.update(|g| {
            if let Err(e) = g.skip_donation() {
                log::error!("Download failed: {}", e);
            }
        });
    };

    view! {
        <div
            class="modal-overlay"
            class:open=move || gate.with(|g| g.is_open())
            on:click=close_on_backdrop
        >
            <div class="modal" role="dialog" aria-modal="true" aria-labelledby="donationTitle">
                <button id="modalClose" class="modal-close" aria-label="Close" on:click=close>
                    "×"
                </button>
                <h2 id="donationTitle">"Enjoying Show Tools?"</h2>
                <p class="modal-text">
                    "It's free. If it earns its place in your rig, a beer keeps the updates coming."
                </p>

                <div class="amount-options">
                    {presets
                        .into_iter()
                        .map(|amount| {
                            let cents = amount.cents();
                            view! {
                                <button
                                    class="amount-btn"
                                    data-amount=cents.to_string()
                                    class:selected=move || {
                                        gate.with(|g| g.selection() == Selection::Preset(cents))
                                    }
                                    on:click=move |_| gate.update(|g| g.select_preset(cents))
                                >
                                    {amount.short_label()}
                                </button>
                            }
                        })
                        .collect_view()}

                    <div
                        class="custom-amount"
                        class:selected=move || gate.with(|g| g.selection() == Selection::Custom)
                    >
                        <span class="currency">"$"</span>
                        <input
                            id="customAmount"
                            type="number"
                            min="2.50"
                            step="0.50"
                            placeholder="Custom"
                            prop:value=move || gate.with(|g| g.custom_input().to_string())
                            on:focus=move |_| gate.update(|g| g.focus_custom())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                gate.update(|g| g.select_custom(&value));
                            }
                        />
                    </div>
                </div>

                <button
                    id="beerBtn"
                    class="btn btn-primary"
                    disabled=move || !gate.with(|g| g.confirm_enabled())
                    on:click=confirm
                >
                    <span class="btn-icon">"🍺"</span>
                    " "
                    {move || gate.with(|g| g.confirm_label())}
                </button>
                <button id="skipBtn" class="btn btn-secondary" on:click=skip>
                    "No thanks, just download"
                </button>
            </div>
        </div>
    }
}
