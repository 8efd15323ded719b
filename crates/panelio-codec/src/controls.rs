// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Control-rack layout rules and the cross-cutting navigation buttons.
//!
//! A document holds at most [`MAX_ROWS`] control rows of [`ROW_WIDTH`] slots
//! each; a select menu occupies a full row. Exceeding the rack is a
//! programming defect ([`PanelioError::LayoutOverflow`]), not a runtime
//! condition — the resource queue re-raises it instead of swallowing it.

use panelio_core::error::PanelioError;
use panelio_core::types::{Button, ButtonStyle, Control};

/// Maximum control rows per document.
pub const MAX_ROWS: usize = 5;

/// Button slots per row. A menu takes the whole row.
pub const ROW_WIDTH: usize = 5;

/// Label of the cross-cutting delete control.
pub const DELETE_LABEL: &str = "delete";
/// Label of the cross-cutting help control.
pub const HELP_LABEL: &str = "help";
/// Label of the cross-cutting back control.
pub const BACK_LABEL: &str = "back";
/// Label of the cross-cutting home control.
pub const HOME_LABEL: &str = "home";

/// The delete button present on every deletable screen.
pub fn delete_button() -> Control {
    Control::Button(Button::new(DELETE_LABEL).with_style(ButtonStyle::Primary))
}

/// The help button rewriting a screen into its help text in place.
pub fn help_button() -> Control {
    Control::Button(Button::new(HELP_LABEL))
}

/// The back button re-invoking the owning screen's menu handler.
pub fn back_button() -> Control {
    Control::Button(Button::new(BACK_LABEL))
}

/// The home button returning to the main menu.
pub fn home_button() -> Control {
    Control::Button(Button::new(HOME_LABEL))
}

fn control_width(control: &Control) -> usize {
    match control {
        Control::Button(_) => 1,
        Control::Menu(_) => ROW_WIDTH,
    }
}

fn explicit_row(control: &Control) -> Option<usize> {
    match control {
        Control::Button(b) => b.row.map(usize::from),
        Control::Menu(m) => m.row.map(usize::from),
    }
}

/// Check that the controls fit the rack.
///
/// Controls with an explicit row are placed there; the rest flow into the
/// first row with space, in order.
pub fn validate_layout(controls: &[Control]) -> Result<(), PanelioError> {
    let mut used = [0usize; MAX_ROWS];
    let requested: usize = controls.iter().map(control_width).sum();

    let overflow = || PanelioError::LayoutOverflow {
        slots: requested,
        capacity: MAX_ROWS * ROW_WIDTH,
    };

    for control in controls {
        let width = control_width(control);
        match explicit_row(control) {
            Some(row) => {
                if row >= MAX_ROWS || used[row] + width > ROW_WIDTH {
                    return Err(overflow());
                }
                used[row] += width;
            }
            None => {
                let slot = used.iter().position(|&u| u + width <= ROW_WIDTH);
                match slot {
                    Some(row) => used[row] += width,
                    None => return Err(overflow()),
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelio_core::types::{Menu, MenuOption};

    fn buttons(n: usize) -> Vec<Control> {
        (0..n)
            .map(|i| Control::Button(Button::new(format!("b{i}"))))
            .collect()
    }

    fn menu() -> Control {
        Control::Menu(Menu::new("pick", vec![MenuOption::new("a")]))
    }

    #[test]
    fn rack_holds_twenty_five_buttons() {
        assert!(validate_layout(&buttons(25)).is_ok());
        assert!(matches!(
            validate_layout(&buttons(26)),
            Err(PanelioError::LayoutOverflow { slots: 26, capacity: 25 })
        ));
    }

    #[test]
    fn menu_occupies_a_full_row() {
        let mut controls = vec![menu()];
        controls.extend(buttons(20));
        assert!(validate_layout(&controls).is_ok());

        let mut controls = vec![menu()];
        controls.extend(buttons(21));
        assert!(validate_layout(&controls).is_err());
    }

    #[test]
    fn five_menus_fill_the_rack() {
        let controls: Vec<Control> = (0..5).map(|_| menu()).collect();
        assert!(validate_layout(&controls).is_ok());
        let mut six = controls;
        six.push(menu());
        assert!(validate_layout(&six).is_err());
    }

    #[test]
    fn explicit_row_out_of_range_overflows() {
        let controls = vec![Control::Button(Button::new("x").with_row(5))];
        assert!(validate_layout(&controls).is_err());
    }

    #[test]
    fn explicit_row_conflict_with_menu_overflows() {
        let controls = vec![
            Control::Menu(Menu::new("pick", vec![MenuOption::new("a")]).with_row(0)),
            Control::Button(Button::new("x").with_row(0)),
        ];
        assert!(validate_layout(&controls).is_err());
    }

    #[test]
    fn navigation_buttons_carry_their_labels() {
        assert_eq!(delete_button().label(), DELETE_LABEL);
        assert_eq!(help_button().label(), HELP_LABEL);
        assert_eq!(back_button().label(), BACK_LABEL);
        assert_eq!(home_button().label(), HOME_LABEL);
    }
}
