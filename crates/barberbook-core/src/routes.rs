//! Route switching between the loading view and the two screen stacks.
//!
//! The route is a pure function of the session state. `Navigator` keeps the
//! screen stack of whichever route is active and resets it whenever the route
//! flips (sign-in, sign-out, end of rehydration).

use crate::auth::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Session still rehydrating; only a spinner is shown
    Loading,
    Unauthenticated,
    Authenticated,
}

impl Route {
    pub fn from_state(state: &AuthState) -> Self {
        if state.loading {
            Route::Loading
        } else if state.user().is_some() {
            Route::Authenticated
        } else {
            Route::Unauthenticated
        }
    }

    /// Screens reachable under this route, initial screen first
    pub fn screens(&self) -> &'static [Screen] {
        match self {
            Route::Loading => &[],
            Route::Unauthenticated => &[Screen::SignIn, Screen::SignUp],
            Route::Authenticated => &[Screen::Dashboard, Screen::Profile, Screen::AppointmentCreated],
        }
    }

    pub fn initial_screen(&self) -> Option<Screen> {
        self.screens().first().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SignIn,
    SignUp,
    Dashboard,
    Profile,
    AppointmentCreated,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::SignIn => "Sign in",
            Screen::SignUp => "Create account",
            Screen::Dashboard => "Providers",
            Screen::Profile => "My profile",
            Screen::AppointmentCreated => "Appointment booked",
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Screen::SignIn | Screen::SignUp => Route::Unauthenticated,
            Screen::Dashboard | Screen::Profile | Screen::AppointmentCreated => Route::Authenticated,
        }
    }
}

/// Screen stack for the active route.
#[derive(Debug, Clone)]
pub struct Navigator {
    route: Route,
    stack: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            route: Route::Loading,
            stack: Vec::new(),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn current(&self) -> Option<Screen> {
        self.stack.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Follow the route derived from the session. Returns true when the
    /// route changed and the stack was reset.
    pub fn sync(&mut self, route: Route) -> bool {
        if route == self.route {
            return false;
        }
        self.route = route;
        self.stack = route.initial_screen().into_iter().collect();
        true
    }

    /// Push a screen of the active route. Navigating to a screen already on
    /// the stack pops back to it instead of stacking a duplicate.
    pub fn navigate(&mut self, screen: Screen) -> bool {
        if screen.route() != self.route {
            return false;
        }
        match self.stack.iter().position(|s| *s == screen) {
            Some(index) => self.stack.truncate(index + 1),
            None => self.stack.push(screen),
        }
        true
    }

    /// Pop the top screen; the route's root screen is never popped
    pub fn go_back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Replace the whole stack with a single screen of the active route
    pub fn reset_to(&mut self, screen: Screen) -> bool {
        if screen.route() != self.route {
            return false;
        }
        self.stack = vec![screen];
        true
    }
}
