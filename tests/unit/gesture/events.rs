use std::cell::RefCell;
use std::rc::Rc;

use super::*;

#[test]
fn typed_listeners_only_see_their_kind() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut l = GestureListeners::new();
    let s = Rc::clone(&seen);
    l.on(GestureEventKind::TransformEnd, move |e| s.borrow_mut().push(*e));

    l.emit(&GestureEvent::TransformStart);
    l.emit(&GestureEvent::TransformEnd);
    assert_eq!(*seen.borrow(), vec![GestureEvent::TransformEnd]);
}

#[test]
fn on_any_runs_in_registration_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut l = GestureListeners::new();
    for tag in ["a", "b"] {
        let o = Rc::clone(&order);
        l.on_any(move |_| o.borrow_mut().push(tag));
    }
    l.emit(&GestureEvent::PrecisionModeEnter);
    assert_eq!(*order.borrow(), vec!["a", "b"]);
}

#[test]
fn off_unsubscribes_once() {
    let count = Rc::new(RefCell::new(0));
    let mut l = GestureListeners::new();
    let c = Rc::clone(&count);
    let id = l.on_any(move |_| *c.borrow_mut() += 1);
    assert!(l.off(id));
    assert!(!l.off(id));
    assert!(l.is_empty());
    l.emit(&GestureEvent::TransformStart);
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn kind_matches_variant() {
    let e = GestureEvent::DoubleTap(Point::new(1.0, 2.0));
    assert_eq!(e.kind(), GestureEventKind::DoubleTap);
}
