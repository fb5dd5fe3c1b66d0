//! Parameter dialogs driven as cancellable operations.

use std::cell::RefCell;
use std::rc::Rc;

use vetro_exec::{Interrupt, Operation, Resolver, Teardown};

type ChangeCallback<P> = Box<dyn FnMut(&P)>;

/// A non-modal parameter dialog.
///
/// The UI edits fields through [`Dialog::set`] and ends the interaction
/// with [`Dialog::ok`] or [`Dialog::dismiss`]; the owning command observes
/// edits through the callback passed to [`Dialog::execute`] and completion
/// through the returned operation.
pub struct Dialog<P> {
    params: Rc<RefCell<P>>,
    resolver: Rc<RefCell<Option<Resolver<P>>>>,
    on_change: Rc<RefCell<Option<ChangeCallback<P>>>>,
}

impl<P: Clone + 'static> Dialog<P> {
    pub fn new(initial: P) -> Rc<Self> {
        Rc::new(Self {
            params: Rc::new(RefCell::new(initial)),
            resolver: Rc::new(RefCell::new(None)),
            on_change: Rc::new(RefCell::new(None)),
        })
    }

    /// Current parameter values.
    pub fn params(&self) -> P {
        self.params.borrow().clone()
    }

    /// Edit the parameters and notify the executing command.
    pub fn set(&self, edit: impl FnOnce(&mut P)) {
        edit(&mut self.params.borrow_mut());
        let params = self.params.borrow().clone();
        if let Some(on_change) = self.on_change.borrow_mut().as_mut() {
            on_change(&params);
        }
    }

    /// Open the dialog. `changed` observes every edit until the dialog
    /// settles; the operation resolves with the accepted parameters.
    pub fn execute(&self, changed: impl FnMut(&P) + 'static) -> Operation<P> {
        let params = self.params.clone();
        let resolver_slot = self.resolver.clone();
        let on_change = self.on_change.clone();

        Operation::new(move |resolver| {
            *resolver_slot.borrow_mut() = Some(resolver.clone());
            *on_change.borrow_mut() = Some(Box::new(changed));

            let cancel = {
                let resolver_slot = resolver_slot.clone();
                let on_change = on_change.clone();
                Box::new(move || {
                    on_change.borrow_mut().take();
                    if let Some(resolver) = resolver_slot.borrow_mut().take() {
                        resolver.reject(Interrupt::Cancel);
                    }
                })
            };
            let finish = {
                let params = params.clone();
                let resolver_slot = resolver_slot.clone();
                let on_change = on_change.clone();
                Box::new(move || {
                    on_change.borrow_mut().take();
                    if let Some(resolver) = resolver_slot.borrow_mut().take() {
                        resolver.resolve(params.borrow().clone());
                    }
                })
            };
            Teardown { cancel, finish }
        })
    }

    /// The OK button: accept the current values.
    pub fn ok(&self) {
        self.on_change.borrow_mut().take();
        let resolver = self.resolver.borrow_mut().take();
        if let Some(resolver) = resolver {
            resolver.resolve(self.params.borrow().clone());
        }
    }

    /// The Cancel button.
    pub fn dismiss(&self) {
        self.on_change.borrow_mut().take();
        let resolver = self.resolver.borrow_mut().take();
        if let Some(resolver) = resolver {
            resolver.reject(Interrupt::Cancel);
        }
    }
}
