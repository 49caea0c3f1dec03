use std::future::IntoFuture;
use std::marker::PhantomData;

// Original: https://github.com/HalsekiRaika/architectured/blob/e5caa5c7ae801d1aaac6e275b3ea0ef26d6ff26b/server/src/controller.rs
/// Turns a request into the DTO a service takes.
pub trait Intake<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

/// Turns a service result into a response.
pub trait Exhaust<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

pub struct Controller<T, P, I, D, O> {
    transformer: T,
    presenter: P,
    _i: PhantomData<I>,
    _t: PhantomData<D>,
    _o: PhantomData<O>,
}

impl<T, P, I, D, O> Controller<T, P, I, D, O> {
    pub fn new(transformer: T, presenter: P) -> Self {
        Self {
            transformer,
            presenter,
            _i: PhantomData,
            _t: PhantomData,
            _o: PhantomData,
        }
    }

    fn preset(self) -> P {
        self.presenter
    }
}

impl<T, P, I, D, O> Controller<T, P, I, D, O>
where
    T: Intake<I, To = D>,
{
    pub fn intake(self, input: I) -> Transformed<T, P, I, D, O> {
        Transformed {
            transformed: self.transformer.emit(input),
            controller: self,
            _i: PhantomData,
            _o: PhantomData,
        }
    }
}

pub struct Transformed<T, P, I, D, O> {
    transformed: D,
    controller: Controller<T, P, I, D, O>,
    _i: PhantomData<I>,
    _o: PhantomData<O>,
}

impl<T, P, I, D, O> Transformed<T, P, I, D, O>
where
    T: Intake<I, To = D>,
    P: Exhaust<O>,
{
    pub async fn handle<F, Fut, E>(self, f: F) -> Result<P::To, E>
    where
        F: FnOnce(D) -> Fut,
        Fut: IntoFuture<Output = Result<O, E>>,
    {
        Ok(self.controller.preset().emit(f(self.transformed).await?))
    }
}

#[cfg(test)]
mod test {
    use super::{Controller, Exhaust, Intake};

    struct Doubler;

    impl Intake<i32> for Doubler {
        type To = i64;
        fn emit(&self, input: i32) -> Self::To {
            i64::from(input) * 2
        }
    }

    struct Printer;

    impl Exhaust<i64> for Printer {
        type To = String;
        fn emit(&self, input: i64) -> Self::To {
            input.to_string()
        }
    }

    #[tokio::test]
    async fn pipes_input_through_service_and_presenter() {
        let out = Controller::new(Doubler, Printer)
            .intake(21)
            .handle(|doubled| async move { Ok::<_, ()>(doubled) })
            .await;
        assert_eq!(out, Ok("42".to_string()));

        let failed = Controller::new(Doubler, Printer)
            .intake(1)
            .handle(|_| async move { Err::<i64, _>("boom") })
            .await;
        assert_eq!(failed, Err("boom"));
    }
}
